//! Hypermedia link builder
//!
//! Produces ordered link sets for single resources and for pages of a
//! collection. URIs come from an external [`UriResolver`]; a relation whose
//! route cannot be resolved is left out.

use crate::core::query::{PageState, ResourceUriType};
use crate::links::link::Link;
use crate::links::registry::{RouteValues, UriResolver, routes};
use uuid::Uuid;

/// Fixed relation of a resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub route: &'static str,
    pub rel: &'static str,
    pub method: &'static str,
}

/// A resource kind that carries hypermedia links
pub trait LinkedResource {
    /// Route of the canonical representation
    const SELF_ROUTE: &'static str;

    /// Route value holding the resource identity (e.g., "authorId")
    const ID_VALUE: &'static str;

    /// Fixed relations, emitted after `self` in this order
    const RELATIONS: &'static [Relation];

    fn resource_id(&self) -> Uuid;
}

/// Query of a pageable collection, able to describe itself as route values
pub trait PageableQuery {
    fn page_number(&self) -> usize;

    /// Route values for the same query on another page
    fn route_values(&self, page_number: usize) -> RouteValues;
}

fn resolve_link(
    resolver: &dyn UriResolver,
    route: &str,
    values: &RouteValues,
    rel: &str,
    method: &str,
) -> Option<Link> {
    match resolver.resolve_uri(route, values) {
        Some(href) => Some(Link::new(href, rel, method)),
        None => {
            tracing::warn!(route, rel, "route did not resolve, link skipped");
            None
        }
    }
}

/// Links for a single resource
///
/// `self` comes first and carries the field list when a non-blank subset was
/// requested; the fixed relations of `R` follow in declaration order.
pub fn links_for_resource<R: LinkedResource>(
    resolver: &dyn UriResolver,
    id: Uuid,
    fields: Option<&str>,
) -> Vec<Link> {
    let id_values = RouteValues::new().with(R::ID_VALUE, id);
    let self_values = id_values
        .clone()
        .with_opt("fields", fields.map(str::trim).filter(|f| !f.is_empty()));

    std::iter::once(resolve_link(resolver, R::SELF_ROUTE, &self_values, "self", "GET"))
        .chain(
            R::RELATIONS
                .iter()
                .map(|relation| {
                    resolve_link(resolver, relation.route, &id_values, relation.rel, relation.method)
                }),
        )
        .flatten()
        .collect()
}

/// URI of a collection page relative to the query's current page
pub fn collection_resource_uri(
    resolver: &dyn UriResolver,
    route: &str,
    query: &impl PageableQuery,
    kind: ResourceUriType,
) -> Option<String> {
    let page_number = kind.page_number(query.page_number());
    resolver.resolve_uri(route, &query.route_values(page_number))
}

/// Links for one page of a collection
///
/// Always `self`, then `nextPage` iff the page state has a next page, then
/// `previousPage` iff it has a previous page.
pub fn links_for_collection(
    resolver: &dyn UriResolver,
    route: &str,
    query: &impl PageableQuery,
    state: &PageState,
) -> Vec<Link> {
    let pages = [
        (ResourceUriType::Current, "self", true),
        (ResourceUriType::NextPage, "nextPage", state.has_next),
        (ResourceUriType::PreviousPage, "previousPage", state.has_previous),
    ];

    pages
        .into_iter()
        .filter(|(_, _, present)| *present)
        .filter_map(|(kind, rel, _)| {
            let values = query.route_values(kind.page_number(query.page_number()));
            resolve_link(resolver, route, &values, rel, "GET")
        })
        .collect()
}

/// Links of the API root document
pub fn root_links(resolver: &dyn UriResolver) -> Vec<Link> {
    let none = RouteValues::new();
    [
        (routes::GET_ROOT, "self", "GET"),
        (routes::GET_AUTHORS, "authors", "GET"),
        (routes::CREATE_AUTHOR, "create_author", "POST"),
    ]
    .into_iter()
    .filter_map(|(route, rel, method)| resolve_link(resolver, route, &none, rel, method))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::registry::RouteRegistry;

    struct Ship;

    impl LinkedResource for Ship {
        const SELF_ROUTE: &'static str = "GetShip";
        const ID_VALUE: &'static str = "shipId";
        const RELATIONS: &'static [Relation] = &[
            Relation {
                route: "CreateCrewForShip",
                rel: "create_crew_for_ship",
                method: "POST",
            },
            Relation {
                route: "GetCrewForShip",
                rel: "crew",
                method: "GET",
            },
            Relation {
                route: "GetCargoForShip",
                rel: "cargo",
                method: "GET",
            },
        ];

        fn resource_id(&self) -> Uuid {
            Uuid::nil()
        }
    }

    struct ShipQuery {
        page: usize,
        order_by: String,
    }

    impl PageableQuery for ShipQuery {
        fn page_number(&self) -> usize {
            self.page
        }

        fn route_values(&self, page_number: usize) -> RouteValues {
            RouteValues::new()
                .with("orderBy", &self.order_by)
                .with("pageNumber", page_number)
        }
    }

    fn resolver() -> RouteRegistry {
        RouteRegistry::new("http://localhost")
            .unwrap()
            .with_route("GetShips", "/ships")
            .with_route("GetShip", "/ships/{shipId}")
            .with_route("CreateCrewForShip", "/ships/{shipId}/crew")
            .with_route("GetCrewForShip", "/ships/{shipId}/crew")
    }

    fn rels(links: &[Link]) -> Vec<&str> {
        links.iter().map(|link| link.rel.as_str()).collect()
    }

    #[test]
    fn test_resource_links_order_and_unresolved_skip() {
        let links = links_for_resource::<Ship>(&resolver(), Uuid::nil(), None);
        assert_eq!(rels(&links), ["self", "create_crew_for_ship", "crew"]);
        assert_eq!(
            links[0].href,
            "http://localhost/ships/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(links[1].method, "POST");
    }

    #[test]
    fn test_self_link_is_field_qualified() {
        let links = links_for_resource::<Ship>(&resolver(), Uuid::nil(), Some("name"));
        assert!(links[0].href.ends_with("?fields=name"));
        assert!(!links[1].href.contains("fields"));

        let blank = links_for_resource::<Ship>(&resolver(), Uuid::nil(), Some("  "));
        assert!(!blank[0].href.contains("fields"));
    }

    #[test]
    fn test_first_of_three_pages() {
        let query = ShipQuery {
            page: 1,
            order_by: "name".to_string(),
        };
        let links = links_for_collection(&resolver(), "GetShips", &query, &PageState::new(1, 10, 30));
        assert_eq!(rels(&links), ["self", "nextPage"]);
        assert_eq!(links[0].href, "http://localhost/ships?orderBy=name&pageNumber=1");
        assert_eq!(links[1].href, "http://localhost/ships?orderBy=name&pageNumber=2");
    }

    #[test]
    fn test_middle_page_has_both_directions() {
        let query = ShipQuery {
            page: 2,
            order_by: "name".to_string(),
        };
        let links = links_for_collection(&resolver(), "GetShips", &query, &PageState::new(2, 10, 30));
        assert_eq!(rels(&links), ["self", "nextPage", "previousPage"]);
        assert!(links[2].href.ends_with("pageNumber=1"));
    }

    #[test]
    fn test_collection_resource_uri() {
        let query = ShipQuery {
            page: 3,
            order_by: "guns desc".to_string(),
        };
        let uri = collection_resource_uri(&resolver(), "GetShips", &query, ResourceUriType::PreviousPage);
        assert_eq!(uri.as_deref(), Some("http://localhost/ships?orderBy=guns+desc&pageNumber=2"));
    }

    #[test]
    fn test_root_links() {
        let registry = RouteRegistry::course_library("http://localhost:3000").unwrap();
        let links = root_links(&registry);
        assert_eq!(rels(&links), ["self", "authors", "create_author"]);
        assert_eq!(links[2].method, "POST");
        assert_eq!(links[2].href, "http://localhost:3000/api/authors");
    }
}
