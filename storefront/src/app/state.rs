//! # Application State Types
//!
//! Screens, role configuration and user-facing notices.

use shared::Role;

/// Navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Startup screen; resolves the stored session
    Splash,
    /// Landing screen for signed-out users
    Welcome,
    Login,
    Signup,
    /// Consumer home: every listed product
    BuyerHome,
    /// Farmer home: profile and own products
    SellerHome,
    SellerListings,
    AddProduct,
    SellerOrders,
    ProductDetails,
    Cart,
    Checkout,
    BuyerProfile,
    SellerProfile,
}

/// Who may open a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user
    Authenticated,
    /// Signed-in users with this role only
    Role(Role),
}

impl Screen {
    pub fn all() -> &'static [Screen] {
        &[
            Screen::Splash,
            Screen::Welcome,
            Screen::Login,
            Screen::Signup,
            Screen::BuyerHome,
            Screen::SellerHome,
            Screen::SellerListings,
            Screen::AddProduct,
            Screen::SellerOrders,
            Screen::ProductDetails,
            Screen::Cart,
            Screen::Checkout,
            Screen::BuyerProfile,
            Screen::SellerProfile,
        ]
    }

    /// Route name used by navigation intents.
    pub fn route_name(&self) -> &'static str {
        match self {
            Screen::Splash => "SplashScreen",
            Screen::Welcome => "HOME",
            Screen::Login => "LOGIN",
            Screen::Signup => "SIGNUP",
            Screen::BuyerHome => "BUYER",
            Screen::SellerHome => "SELLER",
            Screen::SellerListings => "SellerListingScreen",
            Screen::AddProduct => "ADDPRODUCT",
            Screen::SellerOrders => "SELLERORDERS",
            Screen::ProductDetails => "ProductDetails",
            Screen::Cart => "Cart",
            Screen::Checkout => "Checkout",
            Screen::BuyerProfile => "BUYERPROFILE",
            Screen::SellerProfile => "SELLERPROFILE",
        }
    }

    pub fn from_route_name(name: &str) -> Option<Screen> {
        Screen::all().iter().copied().find(|s| s.route_name() == name)
    }

    /// Screen title for header display
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Splash => "FarmLink",
            Screen::Welcome => "Welcome",
            Screen::Login => "Login",
            Screen::Signup => "Create Account",
            Screen::BuyerHome => "Fresh From the Farm",
            Screen::SellerHome => "Dashboard",
            Screen::SellerListings => "My Listings",
            Screen::AddProduct => "Add Product",
            Screen::SellerOrders => "Orders",
            Screen::ProductDetails => "Product Details",
            Screen::Cart => "My Cart",
            Screen::Checkout => "Checkout",
            Screen::BuyerProfile | Screen::SellerProfile => "Profile",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Screen::Splash | Screen::Welcome | Screen::Login | Screen::Signup => Access::Public,
            Screen::ProductDetails => Access::Authenticated,
            Screen::BuyerHome | Screen::Cart | Screen::Checkout | Screen::BuyerProfile => {
                Access::Role(Role::Consumer)
            }
            Screen::SellerHome
            | Screen::SellerListings
            | Screen::AddProduct
            | Screen::SellerOrders
            | Screen::SellerProfile => Access::Role(Role::Farmer),
        }
    }
}

/// Per-role screen wiring. One configuration object replaces the duplicated
/// buyer and seller variants of the home, profile and footer screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleConfig {
    pub role: Role,
    pub home: Screen,
    pub profile: Screen,
    /// Footer tabs, in display order
    pub tabs: &'static [Screen],
}

impl RoleConfig {
    pub const FARMER: RoleConfig = RoleConfig {
        role: Role::Farmer,
        home: Screen::SellerHome,
        profile: Screen::SellerProfile,
        tabs: &[
            Screen::SellerHome,
            Screen::SellerListings,
            Screen::AddProduct,
            Screen::SellerOrders,
            Screen::SellerProfile,
        ],
    };

    pub const CONSUMER: RoleConfig = RoleConfig {
        role: Role::Consumer,
        home: Screen::BuyerHome,
        profile: Screen::BuyerProfile,
        tabs: &[Screen::BuyerHome, Screen::Cart, Screen::BuyerProfile],
    };

    pub fn for_role(role: Role) -> RoleConfig {
        match role {
            Role::Farmer => Self::FARMER,
            Role::Consumer => Self::CONSUMER,
        }
    }

    pub fn has_tab(&self, screen: Screen) -> bool {
        self.tabs.contains(&screen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-shot message for presentation to show (toast or alert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }
}
