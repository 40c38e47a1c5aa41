use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Public `NNNN-NNNN` identifier, immutable once assigned.
    #[sea_orm(unique)]
    pub unique_id: String,
    pub tin: String,
    pub gender: String,
    pub profile_picture: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_details::Entity")]
    EmployeeDetails,
    #[sea_orm(has_many = "super::research_areas::Entity")]
    ResearchAreas,
}

impl Related<super::employee_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeDetails.def()
    }
}

impl Related<super::research_areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchAreas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
