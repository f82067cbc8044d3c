//! Page identifiers, the vendor-category routing table, and the pure
//! page-layout rules applied by the shell.

use serde::{Deserialize, Serialize};

use crate::{DestinationId, DriverId, VehicleId, VendorId};

/// One screen of the app. Exactly one page is current at any time;
/// uninitialized state resolves to [`Page::Landing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Landing,
    Home,
    Food,
    Cart,
    Chat,
    FoodDirectory,
    VendorDetail,
    Profile,
    Reviews,
    RestaurantDashboard,
    PromoVideos,
    HotelDetail,
    DestinationDetail,
    DriverProfile,
    LiveStream,
}

impl Page {
    /// Pages where a non-empty cart is allowed to survive navigation.
    #[must_use]
    pub const fn allows_cart(self) -> bool {
        matches!(self, Self::Food | Self::VendorDetail | Self::Cart)
    }

    #[must_use]
    pub const fn shows_header(self) -> bool {
        !matches!(self, Self::Landing | Self::LiveStream | Self::PromoVideos)
    }

    #[must_use]
    pub const fn shows_footer(self) -> bool {
        matches!(
            self,
            Self::Home | Self::Food | Self::Chat | Self::FoodDirectory | Self::Profile
        )
    }

    #[must_use]
    pub const fn padded(self) -> bool {
        !matches!(
            self,
            Self::Landing | Self::Home | Self::LiveStream | Self::PromoVideos
        )
    }

    #[must_use]
    pub const fn full_bleed_background(self) -> bool {
        matches!(self, Self::Landing | Self::Home)
    }
}

/// Cross-cutting layout flags. Pure function of the current page,
/// recomputed on every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub show_header: bool,
    pub show_footer: bool,
    pub padded: bool,
    pub full_bleed_background: bool,
}

impl PageLayout {
    #[must_use]
    pub const fn for_page(page: Page) -> Self {
        Self {
            show_header: page.shows_header(),
            show_footer: page.shows_footer(),
            padded: page.padded(),
            full_bleed_background: page.full_bleed_background(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorCategory {
    Restaurant,
    Cafe,
    StreetFood,
    Hotel,
    Villa,
    Rental,
}

/// Routing-rule table: which detail page a vendor selection lands on,
/// keyed by entity category.
pub const VENDOR_DETAIL_ROUTES: &[(VendorCategory, Page)] = &[
    (VendorCategory::Restaurant, Page::VendorDetail),
    (VendorCategory::Cafe, Page::VendorDetail),
    (VendorCategory::StreetFood, Page::VendorDetail),
    (VendorCategory::Hotel, Page::HotelDetail),
    (VendorCategory::Villa, Page::HotelDetail),
    (VendorCategory::Rental, Page::VendorDetail),
];

#[must_use]
pub fn detail_page_for(category: VendorCategory) -> Page {
    VENDOR_DETAIL_ROUTES
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(Page::VendorDetail, |(_, page)| *page)
}

// --- Selectable entities ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub category: VendorCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub avatar: Option<String>,
}

/// Transient toast. At most one visible at a time; a new one replaces
/// the prior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationToast {
    pub message: String,
    pub sender: String,
    pub avatar: Option<String>,
}
