use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid response payload: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FrontendError {
    /// Message shown inline in the table area.
    pub fn user_message(&self) -> String {
        match self {
            FrontendError::Backend { status, .. } if *status == 401 || *status == 403 => {
                "Sessão expirada ou sem permissão. Faça login novamente.".to_string()
            }
            FrontendError::Backend { status, .. } => {
                format!("Não foi possível carregar os dados (erro {status}).")
            }
            FrontendError::Http { source } if source.is_timeout() => {
                "O servidor demorou a responder. Tente novamente.".to_string()
            }
            FrontendError::Http { .. } => "Falha de conexão com o servidor.".to_string(),
            FrontendError::Decode { .. } => "Resposta inválida do servidor.".to_string(),
            FrontendError::Storage(_) | FrontendError::Config(_) => "Erro interno da aplicação.".to_string(),
        }
    }
}
