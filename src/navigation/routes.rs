//! Route table: path patterns to pages or games.
//!
//! ## Patterns
//!
//! - `/board` matches exactly that path
//! - `/board/detail/:contentId` captures one segment as `contentId`
//! - `/board/create/:contentId?` captures it when present
//! - `*` matches anything and is used as the NotFound fallback
//!
//! Routes are tried in insertion order; the first match wins.

use serde::Serialize;

use crate::core::{ArcadeError, GameVariant, Result};
use crate::session::GameRegistry;

/// Page shown for paths no route matches.
pub const NOT_FOUND: &str = "NotFound";

/// What a route renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RouteTarget {
    /// Ordinary page with no game session.
    Page(String),
    /// Game page; entering it activates a session.
    Game(GameVariant),
}

impl RouteTarget {
    #[must_use]
    pub fn page(name: &str) -> Self {
        RouteTarget::Page(name.to_string())
    }

    #[must_use]
    pub fn game(&self) -> Option<GameVariant> {
        match self {
            RouteTarget::Game(variant) => Some(*variant),
            RouteTarget::Page(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
    Wildcard,
}

/// One entry of the route table.
#[derive(Clone, Debug)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    target: RouteTarget,
}

impl Route {
    #[must_use]
    pub fn new(pattern: &str, target: RouteTarget) -> Self {
        let segments = split(pattern)
            .map(|part| {
                if part == "*" {
                    Segment::Wildcard
                } else if let Some(name) = part.strip_prefix(':') {
                    match name.strip_suffix('?') {
                        Some(name) => Segment::Param {
                            name: name.to_string(),
                            optional: true,
                        },
                        None => Segment::Param {
                            name: name.to_string(),
                            optional: false,
                        },
                    }
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
            target,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    fn matches(&self, parts: &[&str]) -> Option<Vec<(String, String)>> {
        let mut params = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Literal(literal) => {
                    if parts.get(i) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param { name, optional } => match parts.get(i) {
                    Some(value) => params.push((name.clone(), (*value).to_string())),
                    None if *optional => {}
                    None => return None,
                },
            }
        }
        (parts.len() <= self.segments.len()).then_some(params)
    }
}

/// A resolved path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub pattern: String,
    pub target: RouteTarget,
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    /// Captured value of a `:param` segment.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Ordered list of routes plus the path shown first.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    initial_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RouteTable {
    /// Empty table starting at `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            initial_path: "/".to_string(),
        }
    }

    /// The application's pages, one route per built-in game and a NotFound fallback.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new()
            .with_page("/", "MainPage")
            .with_page("/login", "LoginPage")
            .with_page("/calculator", "Calculator")
            .with_page("/board", "BoardList")
            .with_page("/board/detail/:contentId", "BoardDetail")
            .with_page("/board/create/:contentId?", "BoardCreate")
            .with_initial_path("/login");

        for variant in GameVariant::ALL {
            table = table.with_game(&format!("/games/{}", variant.id()), variant);
        }
        table.with_page("*", NOT_FOUND)
    }

    #[must_use]
    pub fn with_page(mut self, pattern: &str, name: &str) -> Self {
        self.routes.push(Route::new(pattern, RouteTarget::page(name)));
        self
    }

    #[must_use]
    pub fn with_game(mut self, pattern: &str, variant: GameVariant) -> Self {
        self.routes.push(Route::new(pattern, RouteTarget::Game(variant)));
        self
    }

    #[must_use]
    pub fn with_initial_path(mut self, path: &str) -> Self {
        self.initial_path = normalize(path);
        self
    }

    #[must_use]
    pub fn initial_path(&self) -> &str {
        &self.initial_path
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route matching `path`. Query strings and fragments are ignored.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize(path);
        let parts: Vec<&str> = split(&path).collect();
        self.routes.iter().find_map(|route| {
            route.matches(&parts).map(|params| RouteMatch {
                pattern: route.pattern.clone(),
                target: route.target.clone(),
                params,
            })
        })
    }

    /// Every game route must have a registered factory.
    pub fn validate(&self, registry: &GameRegistry) -> Result<()> {
        for route in &self.routes {
            if let RouteTarget::Game(variant) = route.target {
                if !registry.contains(variant) {
                    return Err(ArcadeError::UnknownVariant(format!(
                        "route {} points at unregistered game {}",
                        route.pattern, variant
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Strip query and fragment, collapse to a leading-slash form.
pub(crate) fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = split(path).collect::<Vec<_>>().join("/");
    format!("/{joined}")
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArcadeConfig;

    #[test]
    fn test_static_pages() {
        let table = RouteTable::with_defaults();
        assert_eq!(table.resolve("/").unwrap().target, RouteTarget::page("MainPage"));
        assert_eq!(table.resolve("/board").unwrap().target, RouteTarget::page("BoardList"));
        assert_eq!(table.initial_path(), "/login");
    }

    #[test]
    fn test_required_param() {
        let table = RouteTable::with_defaults();
        let m = table.resolve("/board/detail/42").unwrap();
        assert_eq!(m.target, RouteTarget::page("BoardDetail"));
        assert_eq!(m.param("contentId"), Some("42"));

        // missing required param falls through to NotFound
        let m = table.resolve("/board/detail").unwrap();
        assert_eq!(m.target, RouteTarget::page(NOT_FOUND));
    }

    #[test]
    fn test_optional_param() {
        let table = RouteTable::with_defaults();
        let with = table.resolve("/board/create/7").unwrap();
        assert_eq!(with.param("contentId"), Some("7"));

        let without = table.resolve("/board/create").unwrap();
        assert_eq!(without.target, RouteTarget::page("BoardCreate"));
        assert_eq!(without.param("contentId"), None);
    }

    #[test]
    fn test_game_routes() {
        let table = RouteTable::with_defaults();
        for variant in GameVariant::ALL {
            let m = table.resolve(&format!("/games/{}", variant.id())).unwrap();
            assert_eq!(m.target.game(), Some(variant));
        }
    }

    #[test]
    fn test_normalization() {
        let table = RouteTable::with_defaults();
        let m = table.resolve("games//breaker/?level=2#top").unwrap();
        assert_eq!(m.target, RouteTarget::Game(GameVariant::Breaker));
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/a/b/"), "/a/b");
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let table = RouteTable::with_defaults();
        let m = table.resolve("/games/pong/extra").unwrap();
        assert_eq!(m.target, RouteTarget::page(NOT_FOUND));
        assert!(RouteTable::new().resolve("/x").is_none());
    }

    #[test]
    fn test_validate_against_registry() {
        let full = GameRegistry::with_defaults(ArcadeConfig::default());
        assert!(RouteTable::with_defaults().validate(&full).is_ok());

        let empty = GameRegistry::new(ArcadeConfig::default());
        assert!(matches!(
            RouteTable::with_defaults().validate(&empty),
            Err(ArcadeError::UnknownVariant(_))
        ));
    }
}
