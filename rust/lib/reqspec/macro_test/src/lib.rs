//! Integration tests for the #[client] macro.

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use reqspec_ir::{
        HeaderElement, HttpMethod, ParamRef, QueryElement, ResolvedRequestSpec, TemplatePart,
    };
    use reqspec_macro::client;

    fn specs(json: &str) -> Vec<ResolvedRequestSpec> {
        serde_json::from_str(json).expect("embedded specs are valid JSON")
    }

    // ── Basic client ──

    #[client]
    #[header("Accept", "application/json")]
    #[timeout(connect = 1000)]
    trait Users {
        #[get("/users/:id")]
        async fn find(&self, id: u64) -> String;

        #[post("/users")]
        #[headers("Content-Type: text/plain", "X-Trace: on")]
        #[timeout(request = 2500)]
        async fn create(&self, #[body("application/json")] user: String, #[attr] trace: u32);

        #[request("PURGE", "/cache/:region")]
        #[queries("all=true")]
        fn purge(
            &self,
            #[param("region")] name: String,
            #[query] scope: String,
            #[query("scope")] extra: String,
        ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
    }

    #[test]
    fn one_spec_per_method_in_declared_order() {
        let specs = specs(__USERS_REQUEST_SPECS);
        let names: Vec<_> = specs.iter().map(|s| s.signature.method.as_str()).collect();
        assert_eq!(names, vec!["find", "create", "purge"]);
        assert!(specs.iter().all(|s| s.signature.owner == "Users"));
    }

    #[test]
    fn url_placeholder_bound_to_parameter() {
        let find = &specs(__USERS_REQUEST_SPECS)[0];
        assert_eq!(find.method, HttpMethod::Get);
        assert_eq!(
            find.url,
            vec![
                TemplatePart::constant("/users/"),
                TemplatePart::variable("id", ParamRef::new(0, "id")),
            ]
        );
        assert_eq!(find.signature.params, vec!["u64"]);
        assert!(find.body.is_none());
    }

    #[test]
    fn class_metadata_merged_into_methods() {
        let specs = specs(__USERS_REQUEST_SPECS);
        for spec in &specs {
            assert_eq!(spec.header("Accept"), Some("application/json"));
            assert_eq!(spec.timeout.connect, Some(1000));
        }
        assert_eq!(specs[1].timeout.request, Some(2500));
        assert_eq!(specs[0].timeout.request, None);
    }

    #[test]
    fn body_content_type_wins() {
        let create = &specs(__USERS_REQUEST_SPECS)[1];
        assert_eq!(create.header("Content-Type"), Some("application/json"));
        assert_eq!(create.header("X-Trace"), Some("on"));
        assert_eq!(
            create.headers.iter().filter(|h| h.name == HeaderElement::CONTENT_TYPE).count(),
            1
        );
        let body = create.body.as_ref().unwrap();
        assert_eq!(body.param, ParamRef::new(0, "user"));
        assert_eq!(create.attributes[0].name, "trace");
        assert_eq!(create.attributes[0].param, ParamRef::new(1, "trace"));
    }

    #[test]
    fn custom_verb_with_override_and_queries() {
        let purge = &specs(__USERS_REQUEST_SPECS)[2];
        assert_eq!(purge.method, HttpMethod::Custom("PURGE".into()));
        assert!(!purge.is_standard_method());
        assert_eq!(purge.url_template(), "/cache/:region");
        assert_eq!(
            purge.url[1],
            TemplatePart::variable("region", ParamRef::new(0, "name"))
        );
        // Duplicate query names are kept.
        assert_eq!(
            purge.query,
            vec![
                QueryElement::constant("all", "true"),
                QueryElement::variable("scope", ParamRef::new(1, "scope")),
                QueryElement::variable("scope", ParamRef::new(2, "extra")),
            ]
        );
    }

    // ── Helper attributes are removed, the trait stays usable ──

    #[client]
    trait Health {
        #[get("/health")]
        async fn check(&self) -> bool;
    }

    struct Fake;

    impl Health for Fake {
        async fn check(&self) -> bool {
            true
        }
    }

    #[test]
    fn trait_is_implementable() {
        let _ = Fake.check();
        let specs = specs(__HEALTH_REQUEST_SPECS);
        assert_eq!(specs.len(), 1);
        assert!(specs[0].url_is_constant());
        assert!(specs[0].headers.is_empty());
    }

    // ── Supertraits are resolved where they are declared ──

    #[client]
    trait Paged {
        #[get("/pages")]
        async fn pages(&self) -> u32;
    }

    #[client]
    #[header("X-Api", "2")]
    trait Catalog: Paged {
        #[get("/items")]
        async fn items(&self) -> Vec<String>;
    }

    #[test]
    fn supertrait_methods_stay_with_their_trait() {
        let catalog = specs(__CATALOG_REQUEST_SPECS);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].signature.method, "items");

        let paged = specs(__PAGED_REQUEST_SPECS);
        assert_eq!(paged[0].signature.owner, "Paged");
        assert!(paged[0].header("X-Api").is_none());
    }
}
