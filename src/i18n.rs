//! Short user-facing messages in the document's language.

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Pt,
    En,
}

impl Lang {
    /// `en`, `en-US`, ... select English; anything else Portuguese.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "en" || tag.starts_with("en-") || tag.starts_with("en_") {
            Lang::En
        } else {
            Lang::Pt
        }
    }
}

/// Fixed notices shown after successful operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoginOk,
    UserSaved,
    UserRemoved,
    Saved,
    Published,
    SyncedFresh,
    SyncedFromCache,
    SyncUnavailable,
    TimeLogged,
}

pub fn notice(notice: Notice, lang: Lang) -> &'static str {
    match (notice, lang) {
        (Notice::LoginOk, Lang::Pt) => "Login realizado com sucesso.",
        (Notice::LoginOk, Lang::En) => "Logged in.",
        (Notice::UserSaved, Lang::Pt) => "Usuário salvo.",
        (Notice::UserSaved, Lang::En) => "User saved.",
        (Notice::UserRemoved, Lang::Pt) => "Usuário removido.",
        (Notice::UserRemoved, Lang::En) => "User removed.",
        (Notice::Saved, Lang::Pt) => "Configuração salva.",
        (Notice::Saved, Lang::En) => "Configuration saved.",
        (Notice::Published, Lang::Pt) => "Configuração publicada no servidor.",
        (Notice::Published, Lang::En) => "Configuration published to the server.",
        (Notice::SyncedFresh, Lang::Pt) => "Configuração sincronizada com o servidor.",
        (Notice::SyncedFresh, Lang::En) => "Configuration synchronized with the server.",
        (Notice::SyncedFromCache, Lang::Pt) => {
            "Servidor indisponível, usando a última configuração em cache."
        }
        (Notice::SyncedFromCache, Lang::En) => "Server unavailable, using the last cached configuration.",
        (Notice::SyncUnavailable, Lang::Pt) => {
            "Servidor indisponível e sem cache, usando apenas a configuração local."
        }
        (Notice::SyncUnavailable, Lang::En) => "Server unavailable and no cache, using local configuration only.",
        (Notice::TimeLogged, Lang::Pt) => "Apontamento realizado com sucesso.",
        (Notice::TimeLogged, Lang::En) => "Time entry logged.",
    }
}

/// Localized description of an error.
pub fn message(err: &SyncError, lang: Lang) -> String {
    match (err, lang) {
        (SyncError::Validation(detail), Lang::Pt) => format!("Dados inválidos: {}", detail),
        (SyncError::Validation(detail), Lang::En) => format!("Invalid input: {}", detail),
        (SyncError::InvalidCredentials, Lang::Pt) => "Usuário ou senha inválidos.".into(),
        (SyncError::InvalidCredentials, Lang::En) => "Invalid username or password.".into(),
        (SyncError::NoEndpoint, Lang::Pt) => {
            "Nenhum servidor de configuração definido (MOVIDESK_CONFIG_URL).".into()
        }
        (SyncError::NoEndpoint, Lang::En) => {
            "No configuration server set (MOVIDESK_CONFIG_URL).".into()
        }
        (SyncError::AdminKeyMissing, Lang::Pt) => "Chave de administrador não encontrada.".into(),
        (SyncError::AdminKeyMissing, Lang::En) => "Admin key not found.".into(),
        (SyncError::KeyRejected(_), Lang::Pt) => {
            "Chave de administrador recusada pelo servidor.".into()
        }
        (SyncError::KeyRejected(_), Lang::En) => "Admin key rejected by the server.".into(),
        (SyncError::Server { status, body }, Lang::Pt) => {
            format!("Falha no servidor ({}): {}", status, body)
        }
        (SyncError::Server { status, body }, Lang::En) => {
            format!("Server failure ({}): {}", status, body)
        }
        (SyncError::Network(e), Lang::Pt) => format!("Falha de rede: {}", e),
        (SyncError::Network(e), Lang::En) => format!("Network failure: {}", e),
        (SyncError::Io { path, source }, Lang::Pt) => {
            format!("Falha ao acessar {}: {}", path.display(), source)
        }
        (SyncError::Io { path, source }, Lang::En) => {
            format!("Could not access {}: {}", path.display(), source)
        }
        (SyncError::Corrupt(detail), Lang::Pt) => format!("Documento inválido: {}", detail),
        (SyncError::Corrupt(detail), Lang::En) => format!("Invalid document: {}", detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_tag() {
        assert_eq!(Lang::from_tag("en"), Lang::En);
        assert_eq!(Lang::from_tag("EN-us"), Lang::En);
        assert_eq!(Lang::from_tag("pt-BR"), Lang::Pt);
        assert_eq!(Lang::from_tag(""), Lang::Pt);
        assert_eq!(Lang::from_tag("es"), Lang::Pt);
    }

    #[test]
    fn test_auth_messages_are_distinct() {
        let lang = Lang::En;
        let missing = message(&SyncError::AdminKeyMissing, lang);
        let rejected = message(&SyncError::KeyRejected(String::new()), lang);
        let endpoint = message(&SyncError::NoEndpoint, lang);
        assert_ne!(missing, rejected);
        assert_ne!(missing, endpoint);
        assert_ne!(rejected, endpoint);
    }

    #[test]
    fn test_portuguese_default() {
        assert_eq!(
            message(&SyncError::InvalidCredentials, Lang::Pt),
            "Usuário ou senha inválidos."
        );
        assert_eq!(notice(Notice::TimeLogged, Lang::Pt), "Apontamento realizado com sucesso.");
    }
}
