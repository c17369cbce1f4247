//! Page identifiers: every screen the rendering layer knows how to draw.

/// A renderable page.
///
/// The resolver's job ends at naming one of these plus a locale; page
/// content itself belongs to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Posts,
    Categories,
    About,
    Login,
    ForgetPassword,
    SignUp,
    ResetPassword,
    NotFound,
    ErrorPage,
}

impl Page {
    /// The canonical path of this page below its locale segment.
    ///
    /// `Home` is the bare locale path (`/zh`), so its slug is empty.
    pub const fn slug(&self) -> &'static str {
        match self {
            Page::Home => "",
            Page::Posts => "posts",
            Page::Categories => "categories",
            Page::About => "about",
            Page::Login => "auth/login",
            Page::ForgetPassword => "auth/forget_pass",
            Page::SignUp => "auth/sign_up",
            Page::ResetPassword => "auth/reset_password",
            Page::NotFound => "404",
            Page::ErrorPage => "error",
        }
    }
}
