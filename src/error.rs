use storefront::net::ApiError;
use storefront::state::auth::Redirect;
use storefront::state::product_form::ProductFormError;
use storefront::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("please log in first (isdstore login --email <EMAIL>)")]
    LoginRequired,
    #[error("admin access required")]
    AdminRequired,
    #[error("session expired; please log in again")]
    SessionExpired,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Network error")]
    NetworkError,
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Form(#[from] ProductFormError),
}

impl From<Redirect> for CliError {
    fn from(redirect: Redirect) -> Self {
        match redirect {
            Redirect::Login => Self::LoginRequired,
            Redirect::Home => Self::AdminRequired,
        }
    }
}
