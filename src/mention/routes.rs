use axum::http::Uri;

/// What a mention target address points at on this site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The single-entry page, carrying the entry's public identifier.
    Entry { id: String },
    /// Some other page on this site.
    Other { path: String },
}

/// Maps an absolute address to a route of this site.
pub trait RouteResolver: Send + Sync {
    /// `None` when the address is not served by this site at all.
    fn resolve(&self, target: &str) -> Option<Route>;
}

/// Route table of the blog: entries live at `{base}{entry_prefix}{id}`.
///
/// The base may carry a path (`https://host/~andy`); it is part of every
/// entry address and stripped again on resolve.
#[derive(Debug, Clone)]
pub struct SiteRoutes {
    origin: String,
    host: String,
    port: Option<u16>,
    base_path: String,
    entry_prefix: String,
}

impl SiteRoutes {
    /// `base_url` must be absolute (validated with the configuration).
    pub fn new(base_url: &Uri, entry_prefix: impl Into<String>) -> Self {
        let host = base_url.host().unwrap_or_default().to_ascii_lowercase();
        let port = explicit_port(base_url);
        let origin = match base_url.authority() {
            Some(authority) => format!("{}://{}", base_url.scheme_str().unwrap_or("http"), authority),
            None => String::new(),
        };

        Self {
            origin,
            host,
            port,
            base_path: base_url.path().trim_end_matches('/').to_string(),
            entry_prefix: entry_prefix.into(),
        }
    }

    /// Path of the single-entry page for an identifier.
    pub fn entry_path(&self, id: &str) -> String {
        format!("{}{}{}", self.base_path, self.entry_prefix, id)
    }

    /// Absolute address of the single-entry page for an identifier.
    pub fn entry_url(&self, id: &str) -> String {
        format!("{}{}", self.origin, self.entry_path(id))
    }
}

/// Port written in the address, with the scheme's default treated as absent.
fn explicit_port(uri: &Uri) -> Option<u16> {
    let default = match uri.scheme_str() {
        Some("https") => Some(443),
        Some("http") => Some(80),
        _ => None,
    };
    uri.port_u16().filter(|port| Some(*port) != default)
}

impl RouteResolver for SiteRoutes {
    fn resolve(&self, target: &str) -> Option<Route> {
        let uri: Uri = target.parse().ok()?;
        let host = uri.host()?;
        if !host.eq_ignore_ascii_case(&self.host) || explicit_port(&uri) != self.port {
            return None;
        }

        let path = uri.path();
        let entry_id = path
            .strip_prefix(self.base_path.as_str())
            .and_then(|rest| rest.strip_prefix(self.entry_prefix.as_str()));
        match entry_id {
            Some(id) if !id.is_empty() && !id.contains('/') => Some(Route::Entry { id: id.to_string() }),
            _ => Some(Route::Other {
                path: path.to_string(),
            }),
        }
    }
}
