//! Markup Contract
//!
//! Selectors, attributes and class names the page markup provides. The
//! behaviors only consume these; a page that leaves one out just loses the
//! matching feature.

// ========================
// Theme / Direction
// ========================

pub const THEME_TOGGLE: &str = "[data-theme-toggle]";
pub const THEME_DARK_CLASS: &str = "theme-dark";

pub const RTL_TOGGLE: &str = "[data-rtl-toggle]";
pub const RTL_CLASS: &str = "rtl";
pub const DIR_ATTR: &str = "dir";

// ========================
// Search overlay
// ========================

pub const SEARCH_TRIGGER: &str = "[data-search-trigger]";
pub const SEARCH_OVERLAY: &str = "#siteSearch";
pub const SEARCH_CLOSE: &str = "[data-search-close]";
pub const SEARCH_INPUT: &str = "input";
pub const ARIA_LABEL: &str = "aria-label";

/// Shared by the search overlay and filter tabs
pub const ACTIVE_CLASS: &str = "active";

// ========================
// Counters / Testimonials
// ========================

pub const COUNTER: &str = "[data-counter]";
pub const COUNTER_ATTR: &str = "data-counter";

pub const TESTIMONIAL_CONTAINER: &str = "[data-testimonial-slider]";
pub const TESTIMONIAL_CARD: &str = ".testimonial-card";

// ========================
// Blog / Service filters
// ========================

pub const BLOG_SEARCH: &str = "#blogSearch";
pub const BLOG_TAB: &str = "[data-blog-filter]";
pub const BLOG_TAB_ATTR: &str = "data-blog-filter";
pub const BLOG_ACTIVE_TAB: &str = ".filter-tabs .nav-link.active";
pub const BLOG_CARD: &str = "[data-blog-card]";
pub const BLOG_CARD_CATEGORY_ATTR: &str = "data-blog-category";
pub const BLOG_CARD_TITLE: &str = "h5";

pub const SERVICE_TAB: &str = "[data-service-filter]";
pub const SERVICE_TAB_ATTR: &str = "data-service-filter";
pub const SERVICE_ACTIVE_TAB: &str = "[data-service-filter].active";
pub const SERVICE_CARD: &str = "[data-service-card]";
pub const SERVICE_CARD_CATEGORY_ATTR: &str = "data-service-category";

/// Category value that matches every card
pub const ALL_CATEGORIES: &str = "all";

// ========================
// Pricing / Newsletter / Countdown
// ========================

pub const PRICING_TOGGLE: &str = "[data-pricing-toggle]";
pub const PLAN_PRICE: &str = "[data-plan-price]";
pub const PRICE_SUFFIX_CLASS: &str = "fs-6 text-muted";

pub const NEWSLETTER_FORM: &str = "[data-newsletter]";
pub const NEWSLETTER_FEEDBACK: &str = ".form-text";
pub const NEWSLETTER_SUCCESS_CLASS: &str = "text-success";

pub const COUNTDOWN: &str = "[data-countdown]";
pub const COUNTDOWN_ATTR: &str = "data-countdown";

// ========================
// Settings
// ========================

/// Optional `<script type="application/json">` block overriding defaults
pub const SETTINGS_SCRIPT: &str = "#siteSettings";
