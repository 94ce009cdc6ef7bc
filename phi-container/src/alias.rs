//! Alias keys.
//!
//! An [`Alias`] is the name a caller hands to [`Container::make`]. It is
//! either the name of a registered type (`"Mailer"`) or a symbolic name
//! bound to something else (`"db.helper"`).
//!
//! [`Container::make`]: crate::container::Container::make

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use phi_support::rendering::short_type_name;

/// Names a type or a binding inside the container.
///
/// Case-sensitive. Cheap to clone (shared string).
///
/// # Examples
/// ```
/// use phi_container::alias::Alias;
///
/// let alias = Alias::new("db.helper");
/// assert_eq!(alias.as_str(), "db.helper");
///
/// struct Mailer;
/// assert_eq!(Alias::of::<Mailer>().as_str(), "Mailer");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(Arc<str>);

impl Alias {
    /// Creates an alias from any string.
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Creates the conventional alias of a Rust type: its name without
    /// module paths (`my_app::mail::Mailer` becomes `Mailer`).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()))
    }

    /// Returns the alias text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Alias {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Alias {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for Alias {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&Alias> for Alias {
    fn from(alias: &Alias) -> Self {
        alias.clone()
    }
}

impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Alias {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Alias {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alias({:?})", &*self.0)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
