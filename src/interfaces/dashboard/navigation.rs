//! Dashboard page routing
//!
//! Every dashboard URL resolves to a [`Page`]; [`navigate`] decides whether
//! it is rendered or redirected based on whether the visitor holds a valid
//! session.

pub const DASHBOARD_PREFIX: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Inspections,
    AddInspection,
    Analytics,
    EditInspection(i32),
    Help,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(Page),
}

impl Page {
    /// Resolve a request path, with or without the `/dashboard` prefix.
    pub fn from_path(path: &str) -> Self {
        let relative = path.strip_prefix(DASHBOARD_PREFIX).unwrap_or(path);
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Self::Inspections,
            ["login"] => Self::Login,
            ["add-inspection"] => Self::AddInspection,
            ["analytics"] => Self::Analytics,
            ["help"] => Self::Help,
            ["edit-inspection", id] => id
                .parse()
                .map(Self::EditInspection)
                .unwrap_or(Self::NotFound),
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => format!("{DASHBOARD_PREFIX}/login"),
            Self::Inspections => format!("{DASHBOARD_PREFIX}/"),
            Self::AddInspection => format!("{DASHBOARD_PREFIX}/add-inspection"),
            Self::Analytics => format!("{DASHBOARD_PREFIX}/analytics"),
            Self::EditInspection(id) => format!("{DASHBOARD_PREFIX}/edit-inspection/{id}"),
            Self::Help => format!("{DASHBOARD_PREFIX}/help"),
            Self::NotFound => format!("{DASHBOARD_PREFIX}/not-found"),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Inspections | Self::AddInspection | Self::Analytics | Self::EditInspection(_)
        )
    }
}

pub fn navigate(page: Page, authenticated: bool) -> Navigation {
    match page {
        Page::Login if authenticated => Navigation::Redirect(Page::Inspections),
        p if p.requires_session() && !authenticated => Navigation::Redirect(Page::Login),
        p => Navigation::Render(p),
    }
}
