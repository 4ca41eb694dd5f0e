//! Provider error codes and the user-facing categories they map to.

use darkmatter_common::Notice;

use crate::provider::AuthError;

/// Error codes reported by the identity provider in `error.message`.
///
/// The provider formats messages as `CODE` or `CODE : detail`; only the
/// leading code is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    WeakPassword,
    EmailExists,
    InvalidEmail,
    MissingPassword,
    MissingEmail,
    EmailNotFound,
    InvalidPassword,
    InvalidLoginCredentials,
    UserDisabled,
    TooManyAttempts,
    OperationNotAllowed,
    Unknown(String),
}

impl ProviderErrorCode {
    pub fn parse(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or_default().trim();
        match code {
            "WEAK_PASSWORD"               => Self::WeakPassword,
            "EMAIL_EXISTS"                => Self::EmailExists,
            "INVALID_EMAIL"               => Self::InvalidEmail,
            "MISSING_PASSWORD"            => Self::MissingPassword,
            "MISSING_EMAIL"               => Self::MissingEmail,
            "EMAIL_NOT_FOUND"             => Self::EmailNotFound,
            "INVALID_PASSWORD"            => Self::InvalidPassword,
            "INVALID_LOGIN_CREDENTIALS"   => Self::InvalidLoginCredentials,
            "USER_DISABLED"               => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            "OPERATION_NOT_ALLOWED"       => Self::OperationNotAllowed,
            // Older SDKs only surfaced the human-readable detail.
            _ if message.contains("Password should be at least") => Self::WeakPassword,
            _ => Self::Unknown(message.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::WeakPassword            => "WEAK_PASSWORD",
            Self::EmailExists             => "EMAIL_EXISTS",
            Self::InvalidEmail            => "INVALID_EMAIL",
            Self::MissingPassword         => "MISSING_PASSWORD",
            Self::MissingEmail            => "MISSING_EMAIL",
            Self::EmailNotFound           => "EMAIL_NOT_FOUND",
            Self::InvalidPassword         => "INVALID_PASSWORD",
            Self::InvalidLoginCredentials => "INVALID_LOGIN_CREDENTIALS",
            Self::UserDisabled            => "USER_DISABLED",
            Self::TooManyAttempts         => "TOO_MANY_ATTEMPTS_TRY_LATER",
            Self::OperationNotAllowed     => "OPERATION_NOT_ALLOWED",
            Self::Unknown(raw)            => raw,
        }
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an account could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpFailure {
    PasswordTooShort,
    EmailAlreadyExists,
    InvalidEmail,
    MissingPassword,
    MissingEmail,
    Unexpected,
}

impl SignUpFailure {
    pub fn classify(err: &AuthError) -> Self {
        match err.provider_code() {
            Some(ProviderErrorCode::WeakPassword)    => Self::PasswordTooShort,
            Some(ProviderErrorCode::EmailExists)     => Self::EmailAlreadyExists,
            Some(ProviderErrorCode::InvalidEmail)    => Self::InvalidEmail,
            Some(ProviderErrorCode::MissingPassword) => Self::MissingPassword,
            Some(ProviderErrorCode::MissingEmail)    => Self::MissingEmail,
            _ => Self::Unexpected,
        }
    }

    pub fn notice(self) -> Notice {
        match self {
            Self::PasswordTooShort   => Notice::warning("Password should be at least 6 characters. Try again!"),
            Self::EmailAlreadyExists => Notice::warning("Email already exists!"),
            Self::InvalidEmail       => Notice::warning("Invalid email. Try again!"),
            Self::MissingPassword    => Notice::warning("Missing password!"),
            Self::MissingEmail       => Notice::warning("Missing email!"),
            Self::Unexpected         => Notice::error("Unexpected error. Try later."),
        }
    }
}

/// Why a password-reset email could not be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetFailure {
    EmailNotFound,
    InvalidEmail,
    MissingEmail,
    Unexpected,
}

impl ResetFailure {
    pub fn classify(err: &AuthError) -> Self {
        match err.provider_code() {
            Some(ProviderErrorCode::EmailNotFound) => Self::EmailNotFound,
            Some(ProviderErrorCode::InvalidEmail)  => Self::InvalidEmail,
            Some(ProviderErrorCode::MissingEmail)  => Self::MissingEmail,
            _ => Self::Unexpected,
        }
    }

    pub fn notice(self) -> Notice {
        match self {
            Self::EmailNotFound => Notice::warning("Unregistered email. Try again!"),
            Self::InvalidEmail  => Notice::warning("Invalid email. Try again!"),
            Self::MissingEmail  => Notice::warning("Missing email!"),
            Self::Unexpected    => Notice::error("Unexpected error. Try later."),
        }
    }
}
