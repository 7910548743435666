use valentine_protocol::Profile;

/// What the celebration view shows once the prompt is accepted.
///
/// The profile is optional: a failed lookup still celebrates, falling
/// back to the username from the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Celebration {
    pub username: String,
    pub profile: Option<Profile>,
}

impl Celebration {
    pub fn new(username: impl Into<String>, profile: Option<Profile>) -> Self {
        Self {
            username: username.into(),
            profile,
        }
    }

    /// The name to greet: the profile's display name, then the username.
    pub fn display_name(&self) -> &str {
        match &self.profile {
            Some(profile) => profile.greeting_name(),
            None => &self.username,
        }
    }

    pub fn message(&self) -> String {
        match self.display_name() {
            "" => "Yay! Happy Valentine's Day!".to_string(),
            name => format!("Yay, {name}! Happy Valentine's Day!"),
        }
    }
}
