#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// The signed-in user, as handed over by the authentication provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    pub fn from_config() -> Identity {
        return Identity {
            id: Config::get(ConfigKey::UserId),
            email: Config::get(ConfigKey::UserEmail),
            display_name: Config::get(ConfigKey::DisplayName),
        };
    }

    pub fn display_label(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.to_string();
        }

        if let Some(local_part) = self.email.split('@').next() {
            if !local_part.is_empty() {
                return local_part.to_string();
            }
        }

        return "You".to_string();
    }
}

/// How requests to the GraphQL backend are authorized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    AdminSecret(String),
    Anonymous,
}

impl Credential {
    pub fn new(access_token: &str, admin_secret: &str) -> Credential {
        if !access_token.is_empty() {
            return Credential::Bearer(access_token.to_string());
        }

        if !admin_secret.is_empty() {
            return Credential::AdminSecret(admin_secret.to_string());
        }

        return Credential::Anonymous;
    }

    pub fn from_config() -> Credential {
        return Credential::new(
            &Config::get(ConfigKey::AccessToken),
            &Config::get(ConfigKey::AdminSecret),
        );
    }
}
