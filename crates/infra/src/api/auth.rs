//! Authentication endpoints
//!
//! Login exchanges a username and password for a credential pair using the
//! backend's OAuth2 password form. It is sent without a bearer header and is
//! never routed through the refresh coordinator: a 401 here means the
//! credentials were wrong, not that a session expired.

use devconsole_domain::constants::CURRENT_USER_PATH;
use devconsole_domain::{ApiError, Credential, RequestSpec, TokenResponse, UserInfo};
use tracing::{info, instrument};

use super::client::ApiClient;

impl ApiClient {
    /// Sign in and store the issued credential
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` for rejected credentials, `ApiError::Decode`
    /// for an unexpected token payload, `ApiError::Storage` if the credential
    /// cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let spec = RequestSpec::post(self.config.login_path.clone())
            .form([("username", username), ("password", password)])
            .anonymous();

        let tokens: TokenResponse = self.dispatcher.dispatch(spec).await?.json()?;
        let credential = Credential::from(tokens);
        self.store().set(credential.clone()).await?;

        info!("signed in");
        Ok(credential)
    }

    /// Forget the credential and return to the login route
    ///
    /// # Errors
    ///
    /// `ApiError::Storage` if the store cannot be cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store().clear().await?;
        self.navigator.navigate(&self.config.login_route);
        info!("signed out");
        Ok(())
    }

    /// Profile of the signed-in user
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        self.get(CURRENT_USER_PATH).await
    }

    /// Whether a credential is currently stored
    ///
    /// # Errors
    ///
    /// `ApiError::Storage` if the store cannot be read.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.store().get().await?.is_some())
    }
}
