//! App listings and published apps.
//!
//! An upload starts life as an [`AppListing`]. Publishing the listing with
//! the payment product and media link is the only way to obtain an [`App`],
//! which is the only shape the app index accepts.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ports::{MediaLink, ProductPrice};

/// Multiplier converting whole currency units into minor units.
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// Opaque app identifier, also used as the index key and media object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for AppId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// App metadata received with an upload, before any side effects ran.
///
/// # Examples
/// ```
/// use appstore::domain::AppListing;
///
/// let listing = AppListing::new("alice", "Foo", "Bar", 10);
/// assert_eq!(listing.unit_amount(), Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppListing {
    id: AppId,
    user: String,
    title: String,
    description: String,
    price: i64,
}

impl AppListing {
    /// Create a listing with a freshly generated identifier.
    pub fn new(
        user: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Self {
        Self::with_id(AppId::random(), user, title, description, price)
    }

    /// Create a listing with a caller-chosen identifier.
    pub fn with_id(
        id: AppId,
        user: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id,
            user: user.into(),
            title: title.into(),
            description: description.into(),
            price,
        }
    }

    /// Identifier shared by the index document and the media object.
    #[must_use]
    pub fn id(&self) -> &AppId {
        &self.id
    }

    /// Owning user.
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_str()
    }

    /// Listing title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Listing description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Price in whole currency units.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Price in minor currency units, or `None` when the conversion overflows.
    #[must_use]
    pub fn unit_amount(&self) -> Option<i64> {
        self.price.checked_mul(MINOR_UNITS_PER_UNIT)
    }

    /// Combine the listing with its payment product and media link.
    #[must_use]
    pub fn publish(self, product: ProductPrice, media_link: MediaLink) -> App {
        let Self {
            id,
            user,
            title,
            description,
            price,
        } = self;
        let ProductPrice {
            product_id,
            price_id,
        } = product;
        App {
            id,
            user,
            title,
            description,
            price,
            url: media_link.into(),
            product_id,
            price_id,
        }
    }
}

/// Published app as stored in the app index.
///
/// Serialised field names are the index document contract:
/// `id`, `user`, `title`, `description`, `price`, `url`, `product_id`,
/// `price_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    id: AppId,
    user: String,
    title: String,
    description: String,
    price: i64,
    url: String,
    product_id: String,
    price_id: String,
}

impl App {
    /// App identifier.
    #[must_use]
    pub fn id(&self) -> &AppId {
        &self.id
    }

    /// Owning user.
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_str()
    }

    /// App title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// App description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Price in whole currency units.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Public link to the uploaded media.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Payment provider product identifier.
    #[must_use]
    pub fn product_id(&self) -> &str {
        self.product_id.as_str()
    }

    /// Payment provider price identifier used for checkout.
    #[must_use]
    pub fn price_id(&self) -> &str {
        self.price_id.as_str()
    }
}
