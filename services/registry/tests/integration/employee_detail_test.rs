use personnel_domain::locale::Locale;
use personnel_registry::error::RegistryError;
use personnel_registry::usecase::employee_detail::{
    EmployeeDetailInput, ListEmployeeDetailsUseCase, UpdateEmployeeDetailsInput,
    UpdateEmployeeDetailsUseCase,
};

use crate::helpers::{MemDb, messages};

fn input(id: i64, employee_id: i64, surname: &str) -> EmployeeDetailInput {
    EmployeeDetailInput {
        id,
        employee_id,
        surname: surname.to_owned(),
        name: format!("{surname}-name"),
        middlename: String::new(),
    }
}

fn update_uc(db: &MemDb) -> UpdateEmployeeDetailsUseCase<MemDb> {
    UpdateEmployeeDetailsUseCase {
        store: db.clone(),
        messages: messages(),
    }
}

// ── ListEmployeeDetails ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_details_in_requested_language_only() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");
    let en = db.seed_detail(employee.id, Locale::En, "Smith");
    db.seed_detail(employee.id, Locale::Ru, "Смирнов");

    let details = ListEmployeeDetailsUseCase { repo: db.clone() }
        .execute(employee.id, Locale::En)
        .await
        .unwrap();

    assert_eq!(details, vec![en]);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_employee() {
    let db = MemDb::new();
    let result = ListEmployeeDetailsUseCase { repo: db.clone() }
        .execute(42, Locale::En)
        .await;
    assert!(
        matches!(result, Err(RegistryError::NotFound)),
        "got {result:?}"
    );
}

// ── UpdateEmployeeDetails ────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_create_and_remove_details() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");
    let kept = db.seed_detail(employee.id, Locale::En, "Smith");
    let dropped = db.seed_detail(employee.id, Locale::En, "Jones");
    let russian = db.seed_detail(employee.id, Locale::Ru, "Смирнов");

    let details = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: employee.id,
            locale: Locale::En,
            details: vec![
                input(kept.id, employee.id, "Smythe"),
                input(0, employee.id, "Brown"),
            ],
        })
        .await
        .unwrap();

    assert_eq!(details.len(), 2);
    assert_eq!(details[0].id, kept.id);
    assert_eq!(details[0].surname, "Smythe");
    assert_eq!(details[1].surname, "Brown");
    assert!(details.iter().all(|d| d.id != dropped.id));

    let state = db.snapshot();
    assert!(
        state.details.contains(&russian),
        "details in other languages must be untouched"
    );
    assert_eq!(state.details.len(), 3);
}

#[tokio::test]
async fn should_remove_all_details_of_language_for_empty_submission() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");
    db.seed_detail(employee.id, Locale::En, "Smith");
    db.seed_detail(employee.id, Locale::En, "Jones");
    db.seed_detail(employee.id, Locale::Tg, "Раҳимов");

    let details = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: employee.id,
            locale: Locale::En,
            details: vec![],
        })
        .await
        .unwrap();

    assert!(details.is_empty());
    let state = db.snapshot();
    assert_eq!(state.details.len(), 1);
    assert_eq!(state.details[0].language, Locale::Tg);
}

#[tokio::test]
async fn should_reject_item_for_other_employee() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");

    let result = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: employee.id,
            locale: Locale::En,
            details: vec![input(0, employee.id + 1, "Smith")],
        })
        .await;

    assert!(
        matches!(&result, Err(RegistryError::BadRequest(m)) if m.contains("does not match")),
        "got {result:?}"
    );
    assert_eq!(db.commits(), 0);
}

#[tokio::test]
async fn should_reject_duplicate_ids() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");
    let detail = db.seed_detail(employee.id, Locale::En, "Smith");

    let result = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: employee.id,
            locale: Locale::En,
            details: vec![
                input(detail.id, employee.id, "A"),
                input(detail.id, employee.id, "B"),
            ],
        })
        .await;

    assert!(
        matches!(result, Err(RegistryError::BadRequest(_))),
        "got {result:?}"
    );
    assert_eq!(db.snapshot().details, vec![detail]);
}

#[tokio::test]
async fn should_return_not_found_for_foreign_detail_id_and_roll_back() {
    let db = MemDb::new();
    let ann = db.seed_employee("0001-0001");
    let bob = db.seed_employee("0002-0002");
    let anns = db.seed_detail(ann.id, Locale::En, "Smith");
    let bobs = db.seed_detail(bob.id, Locale::En, "Brown");

    let result = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: ann.id,
            locale: Locale::En,
            details: vec![
                input(anns.id, ann.id, "Smythe"),
                input(bobs.id, ann.id, "Stolen"),
            ],
        })
        .await;

    assert!(
        matches!(result, Err(RegistryError::NotFound)),
        "got {result:?}"
    );
    let state = db.snapshot();
    assert_eq!(state.details, vec![anns, bobs], "nothing may change");
}

#[tokio::test]
async fn should_roll_back_partial_update_on_failure() {
    let db = MemDb::new();
    let employee = db.seed_employee("0001-0001");
    let detail = db.seed_detail(employee.id, Locale::En, "Smith");
    db.faults().fail_create_detail = true;

    let result = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: employee.id,
            locale: Locale::En,
            details: vec![
                input(detail.id, employee.id, "Smythe"),
                input(0, employee.id, "Brown"),
            ],
        })
        .await;

    assert!(
        matches!(result, Err(RegistryError::Internal(_))),
        "got {result:?}"
    );
    assert_eq!(
        db.snapshot().details,
        vec![detail],
        "applied update must be rolled back"
    );
}

#[tokio::test]
async fn should_return_not_found_when_updating_unknown_employee() {
    let db = MemDb::new();
    let result = update_uc(&db)
        .execute(UpdateEmployeeDetailsInput {
            employee_id: 7,
            locale: Locale::En,
            details: vec![input(0, 7, "Smith")],
        })
        .await;
    assert!(
        matches!(result, Err(RegistryError::NotFound)),
        "got {result:?}"
    );
    assert!(db.snapshot().details.is_empty());
}
