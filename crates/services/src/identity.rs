//! Signed-in student identity and the gate in front of personal views.

/// The signed-in student, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    name: String,
    email: Option<String>,
}

impl Student {
    #[must_use]
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        let email = email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty());
        Self {
            name: name.into(),
            email,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact address used for tutor notifications.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Name shown in greetings: the first word of the name, or "there".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("there")
    }
}

/// Identity provider state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Loading,
    SignedOut,
    SignedIn(Student),
}

impl AuthState {
    #[must_use]
    pub fn student(&self) -> Option<&Student> {
        match self {
            Self::SignedIn(student) => Some(student),
            Self::Loading | Self::SignedOut => None,
        }
    }

    /// Resolve the gate: `Ok` with the student when signed in, otherwise the
    /// view to show instead.
    ///
    /// # Errors
    ///
    /// Returns `Gated::Loading` while identity is unresolved and
    /// `Gated::SignInRequired` when signed out.
    pub fn require<T>(&self) -> Result<&Student, Gated<T>> {
        match self {
            Self::SignedIn(student) => Ok(student),
            Self::Loading => Err(Gated::Loading),
            Self::SignedOut => Err(Gated::SignInRequired),
        }
    }
}

/// A view that requires a signed-in student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
    /// Identity is still resolving; render a loading indicator.
    Loading,
    /// Redirect to sign-in. No personal data was read.
    SignInRequired,
    Ready(T),
}

impl<T> Gated<T> {
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::SignInRequired => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_dropped() {
        let student = Student::new("Ada Lovelace", Some("  ".into()));
        assert_eq!(student.email(), None);
        assert_eq!(student.display_name(), "Ada");
    }

    #[test]
    fn gate_follows_auth_state() {
        assert_eq!(AuthState::Loading.require::<()>(), Err(Gated::Loading));
        assert_eq!(
            AuthState::SignedOut.require::<()>(),
            Err(Gated::SignInRequired)
        );
        let student = Student::new("Ada", Some("ada@example.com".into()));
        let auth = AuthState::SignedIn(student.clone());
        assert_eq!(auth.require::<()>(), Ok(&student));
    }
}
