use std::sync::Arc;

use tracing::{info, warn};

use crate::models::player::Player;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::player_service_errors::PlayerServiceError;

#[derive(Clone)]
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

pub fn validate_login(login: &str) -> Result<(), PlayerServiceError> {
    if login.is_empty() {
        return Err(PlayerServiceError::InvalidLogin(
            "Login cannot be empty".to_string(),
        ));
    }
    if login.chars().any(char::is_control) {
        return Err(PlayerServiceError::InvalidLogin(
            "Login cannot contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// Minimal `local@domain` shape: a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), PlayerServiceError> {
    if email.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(PlayerServiceError::InvalidEmail(
            "Email cannot contain whitespace or control characters".to_string(),
        ));
    }
    let (local, domain) = email.rsplit_once('@').ok_or_else(|| {
        PlayerServiceError::InvalidEmail(format!("Missing '@' in {:?}", email))
    })?;
    if local.is_empty() {
        return Err(PlayerServiceError::InvalidEmail(
            "Email local part cannot be empty".to_string(),
        ));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(PlayerServiceError::InvalidEmail(format!(
            "Invalid domain {:?}",
            domain
        )));
    }
    Ok(())
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        PlayerService { repository }
    }

    pub async fn register(
        &self,
        login: &str,
        secret: &str,
        email: &str,
    ) -> Result<Player, PlayerServiceError> {
        validate_login(login)?;
        validate_email(email)?;

        if self.repository.login_exists(login).await? {
            warn!("Registration rejected, login taken: {}", login);
            return Err(PlayerServiceError::DuplicateLogin);
        }
        if self.repository.email_owner(email).await?.is_some() {
            warn!("Registration rejected, email taken for login {}", login);
            return Err(PlayerServiceError::DuplicateEmail);
        }

        let player = Player::new(login.to_string(), secret, email.to_string());
        // A concurrent registration can still win the race; the constraint reports it.
        self.repository.create_player(&player).await?;

        info!("Registered player {}", login);
        Ok(player)
    }

    pub async fn load(&self, login: &str) -> Result<Option<Player>, PlayerServiceError> {
        Ok(self.repository.get_player(login).await?)
    }

    pub async fn load_by_email(&self, email: &str) -> Result<Option<Player>, PlayerServiceError> {
        Ok(self.repository.get_player_by_email(email).await?)
    }

    /// Every player, highest rating first, ties by login.
    pub async fn load_all_by_rating(&self) -> Result<Vec<Player>, PlayerServiceError> {
        Ok(self.repository.list_by_rating().await?)
    }

    /// Persists email, credential and rating of an existing player.
    pub async fn save(&self, player: &Player) -> Result<(), PlayerServiceError> {
        validate_email(player.email())?;
        if !player.rating().is_finite() {
            return Err(PlayerServiceError::StorageError(format!(
                "Refusing to store non-finite rating {}",
                player.rating()
            )));
        }

        if let Some(owner) = self.repository.email_owner(player.email()).await? {
            if owner != player.login() {
                warn!(
                    "Save rejected for {}: email belongs to {}",
                    player.login(),
                    owner
                );
                return Err(PlayerServiceError::DuplicateEmail);
            }
        }

        self.repository.update_player(player).await?;
        info!("Saved player {}", player.login());
        Ok(())
    }

    /// Checks `secret` against the verifier currently stored for `player`.
    pub async fn verify_credential(
        &self,
        player: &Player,
        secret: &str,
    ) -> Result<bool, PlayerServiceError> {
        Ok(self
            .repository
            .get_player(player.login())
            .await?
            .map_or(false, |stored| stored.credential().verify(secret)))
    }
}
