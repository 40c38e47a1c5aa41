//! Localized user-facing messages.
//!
//! The table is built once at startup ([`Messages::builtin`]) and shared
//! read-only (`Arc<Messages>`) by the error middleware and the usecases that
//! produce client-facing validation errors.

use std::collections::HashMap;

use crate::locale::Locale;

/// Identifies a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // Status-level messages, used for every non-400 error response.
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
    UnknownError,
    // Client errors.
    InvalidCredentials,
    EmailAlreadyExists,
    InvalidEmail,
    InvalidPassword,
    InvalidTin,
    InvalidGender,
    EmployeeMismatch,
    EmptyTitle,
    DuplicateItemId,
}

const TABLE: &[(MessageKey, [&str; 3])] = &[
    (
        MessageKey::BadRequest,
        ["Bad request", "Некорректный запрос", "Дархости нодуруст"],
    ),
    (
        MessageKey::Unauthorized,
        ["Unauthorized", "Не авторизован", "Иҷозат нест"],
    ),
    (MessageKey::NotFound, ["Not found", "Не найдено", "Ёфт нашуд"]),
    (
        MessageKey::InternalServerError,
        [
            "Internal server error",
            "Внутренняя ошибка сервера",
            "Хатогии дохилии сервер",
        ],
    ),
    (
        MessageKey::UnknownError,
        ["Unknown error", "Неизвестная ошибка", "Хатогии номаълум"],
    ),
    (
        MessageKey::InvalidCredentials,
        [
            "Invalid email or password",
            "Неверный адрес электронной почты или пароль",
            "Почтаи электронӣ ё рамз нодуруст аст",
        ],
    ),
    (
        MessageKey::EmailAlreadyExists,
        [
            "Email {email} already exists",
            "Адрес электронной почты {email} уже существует",
            "Почтаи электронии {email} аллакай вуҷуд дорад",
        ],
    ),
    (
        MessageKey::InvalidEmail,
        [
            "Invalid email address",
            "Некорректный адрес электронной почты",
            "Почтаи электронӣ нодуруст аст",
        ],
    ),
    (
        MessageKey::InvalidPassword,
        [
            "Password must be between 1 and 128 characters",
            "Пароль должен содержать от 1 до 128 символов",
            "Рамз бояд аз 1 то 128 аломат бошад",
        ],
    ),
    (
        MessageKey::InvalidTin,
        ["Invalid TIN", "Некорректный ИНН", "РМА нодуруст аст"],
    ),
    (
        MessageKey::InvalidGender,
        [
            "Gender must be M or F",
            "Пол должен быть M или F",
            "Ҷинс бояд M ё F бошад",
        ],
    ),
    (
        MessageKey::EmployeeMismatch,
        [
            "Employee id does not match the request path",
            "Идентификатор сотрудника не совпадает с адресом запроса",
            "Идентификатори корманд ба суроғаи дархост мувофиқат намекунад",
        ],
    ),
    (
        MessageKey::EmptyTitle,
        [
            "Title must not be empty",
            "Название не может быть пустым",
            "Сарлавҳа холӣ буда наметавонад",
        ],
    ),
    (
        MessageKey::DuplicateItemId,
        [
            "Each item id may appear only once",
            "Идентификатор элемента не может повторяться",
            "Идентификатори унсур такрор шуда наметавонад",
        ],
    ),
];

/// Immutable message table keyed by locale and message key.
#[derive(Debug, Clone)]
pub struct Messages {
    default_locale: Locale,
    table: HashMap<(Locale, MessageKey), &'static str>,
}

impl Messages {
    /// Build the compiled-in table. `default_locale` is used for requests
    /// without a supported language tag.
    pub fn builtin(default_locale: Locale) -> Self {
        let mut table = HashMap::with_capacity(TABLE.len() * Locale::ALL.len());
        for (key, texts) in TABLE {
            for (locale, text) in Locale::ALL.into_iter().zip(texts.iter()) {
                table.insert((locale, *key), *text);
            }
        }
        Self {
            default_locale,
            table,
        }
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Look up a message, falling back to the default locale and then English.
    pub fn get(&self, locale: Locale, key: MessageKey) -> &str {
        self.table
            .get(&(locale, key))
            .or_else(|| self.table.get(&(self.default_locale, key)))
            .or_else(|| self.table.get(&(Locale::En, key)))
            .copied()
            .unwrap_or("")
    }

    /// Look up a message and substitute `{name}` placeholders.
    pub fn render(&self, locale: Locale, key: MessageKey, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(locale, key).to_owned(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
