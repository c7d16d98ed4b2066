//! Error codes for the Escala service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Swap request errors
//! - 5xxx: Settings errors
//! - 9xxx: System errors

use serde::Serialize;
use std::fmt;

/// Error code carried in every error body.
///
/// Serialized as its `u16` value so web clients can switch on it without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx: General
    ValidationFailed = 2,
    RateLimited = 6,

    // 1xxx: Auth
    NotAuthenticated = 1001,
    /// Unknown login or wrong password (deliberately indistinguishable)
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    AccountDisabled = 1005,

    // 2xxx: Permission
    AdminRequired = 2002,
    /// Users cannot change their own status or role
    CannotModifySelf = 2003,
    /// Only the submitter may delete a request
    NotRequestOwner = 2004,

    // 3xxx: User
    UserNotFound = 3001,
    UserLoginExists = 3002,
    CurrentPasswordInvalid = 3003,

    // 4xxx: Swap request
    RequestNotFound = 4001,
    /// Status is neither SOLICITADO nor NAO_REALIZADA
    RequestNotDeletable = 4002,
    SubmissionWindowClosed = 4003,

    // 5xxx: Settings
    SettingsNotFound = 5001,

    // 9xxx: System
    InternalError = 9001,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default user-facing message (Portuguese, like the rest of the UI)
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Dados inválidos",
            ErrorCode::RateLimited => "Muitas tentativas, tente novamente mais tarde",

            ErrorCode::NotAuthenticated => "Usuário não autenticado",
            ErrorCode::InvalidCredentials => "Login ou senha inválidos",
            ErrorCode::TokenExpired => "Sessão expirada, faça login novamente",
            ErrorCode::TokenInvalid => "Token de autenticação inválido",
            ErrorCode::AccountDisabled => "Conta desativada",

            ErrorCode::AdminRequired => "Acesso restrito a administradores",
            ErrorCode::CannotModifySelf => "Você não pode alterar seu próprio status ou perfil",
            ErrorCode::NotRequestOwner => "Apenas quem criou a solicitação pode realizar esta ação",

            ErrorCode::UserNotFound => "Usuário não encontrado",
            ErrorCode::UserLoginExists => "Login já está em uso",
            ErrorCode::CurrentPasswordInvalid => "Senha atual incorreta",

            ErrorCode::RequestNotFound => "Solicitação não encontrada",
            ErrorCode::RequestNotDeletable => {
                "Apenas solicitações com status SOLICITADO ou NAO_REALIZADA podem ser excluídas"
            }
            ErrorCode::SubmissionWindowClosed => "O período de envio de solicitações está fechado",

            ErrorCode::SettingsNotFound => "Configurações não inicializadas",

            ErrorCode::InternalError => "Erro interno do servidor",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
