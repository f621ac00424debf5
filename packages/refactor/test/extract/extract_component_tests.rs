/**
 * Extract Component Tests
 *
 * End-to-end extraction: selection, scanning, rendering and the edit of the
 * source template.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::parse_clean;
    use angular_refactor::extract::NoSymbols;
    use angular_refactor::{
        extract_component, extract_selection, ExtractConfig, ExtractError, ExtractionPlan, SymbolResolver,
        SymbolTable,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Byte range from the start of `from` to the end of `to`
    fn range(source: &str, from: &str, to: &str) -> (usize, usize) {
        let start = source.find(from).unwrap();
        let end = source[start..].find(to).unwrap() + start + to.len();
        (start, end)
    }

    fn extract(
        source: &str,
        (start, end): (usize, usize),
        name: &str,
        resolver: &dyn SymbolResolver,
    ) -> Result<ExtractionPlan, ExtractError> {
        extract_selection(source, "TestComp", start, end, name, resolver, &ExtractConfig::default())
    }

    fn extract_all(source: &str, name: &str, resolver: &dyn SymbolResolver) -> ExtractionPlan {
        extract(source, (0, source.len()), name, resolver).unwrap()
    }

    mod scenarios {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_extract_a_property_binding() {
            let source = "<div>\n  <span [value]=\"user.name\"></span>\n</div>";
            let symbols = SymbolTable::new().with_field("user", Some("User"));
            let plan = extract(source, range(source, "<span", "</span>"), "NameLabel", &symbols).unwrap();

            assert_eq!(plan.component_name, "NameLabel");
            assert_eq!(plan.class_name, "NameLabelComponent");
            assert_eq!(plan.kebab_name, "name-label");
            assert_eq!(plan.selector, "app-name-label");
            assert_eq!(plan.class_file_name, "name-label.component.ts");
            assert_eq!(plan.template_file_name, "name-label.component.html");
            assert_eq!(plan.invocation_text, "<app-name-label [user]=\"user\"></app-name-label>");
            assert!(plan.class_text.contains("\n  @Input() user: User;\n"));
            assert_eq!(plan.template_text, "<span [value]=\"user.name\"></span>");
            assert_eq!(
                plan.apply(source),
                "<div>\n  <app-name-label [user]=\"user\"></app-name-label>\n</div>"
            );
        }

        #[test]
        fn should_extract_a_two_way_binding() {
            let source = "<input [(ngModel)]=\"count\">";
            let symbols = SymbolTable::new().with_field("count", Some("number"));
            let plan = extract_all(source, "Counter", &symbols);

            assert_eq!(plan.invocation_text, "<app-counter [(count)]=\"count\"></app-counter>");
            assert!(plan.class_text.contains(
                "  @Output() countChange = new EventEmitter<number>();\n  @Input() count: number;\n"
            ));
            assert_eq!(
                plan.template_text,
                "<input [(ngModel)]=\"count\" (ngModelChange)=\"countChange.emit($event)\">"
            );
            assert_eq!(plan.inputs.len(), 1);
            assert!(plan.inputs[0].is_two_way);
        }

        #[test]
        fn should_extract_an_event_handler() {
            let source = "<button (click)=\"save()\">Save</button>";
            let plan = extract_all(source, "Saver", &NoSymbols);

            assert_eq!(plan.invocation_text, "<app-saver (save)=\"save()\"></app-saver>");
            assert_eq!(plan.events, vec!["save"]);
            assert!(plan.inputs.is_empty());
            assert!(plan.class_text.contains("  @Output(\"save\") saveEvent = new EventEmitter<void>();\n"));
            assert!(plan.class_text.contains("  save() {\n    this.saveEvent.emit();\n  }\n"));
            assert_eq!(plan.template_text, source);
        }

        #[test]
        fn should_extract_sibling_runs() {
            let source = "<ul><li>{{ a }}</li><li>{{ b }}</li><li>{{ c }}</li></ul>";
            let plan = extract(source, range(source, "<li>{{ a", "{{ b }}</li>"), "Pair", &NoSymbols).unwrap();

            assert_eq!(plan.invocation_text, "<app-pair [a]=\"a\" [b]=\"b\"></app-pair>");
            assert_eq!(plan.template_text, "<li>{{ a }}</li><li>{{ b }}</li>");
            assert_eq!(
                plan.apply(source),
                "<ul><app-pair [a]=\"a\" [b]=\"b\"></app-pair><li>{{ c }}</li></ul>"
            );
        }

        #[test]
        fn should_ignore_whitespace_around_the_selection() {
            let source = "<div>\n  <p>{{ note }}</p>\n</div>";
            let plan = extract(source, range(source, "\n  <p>", "</p>\n"), "Note", &NoSymbols).unwrap();
            assert_eq!(plan.template_text, "<p>{{ note }}</p>");
            assert_eq!(plan.apply(source), "<div>\n  <app-note [note]=\"note\"></app-note>\n</div>");
        }

        #[test]
        fn should_keep_fragment_variables_inside() {
            let source = "<li *ngFor=\"let item of items\">{{ item.label }}</li>";
            let plan = extract_all(source, "ItemList", &SymbolTable::new().with_field("items", Some("Item[]")));
            assert_eq!(plan.invocation_text, "<app-item-list [items]=\"items\"></app-item-list>");
            assert!(plan.class_text.contains("@Input() items: Item[];"));
        }

        #[test]
        fn should_replace_call_results_with_inputs() {
            let source = "<h1>{{ title }}: {{ fullName() }}</h1>";
            let plan = extract_all(source, "Heading", &NoSymbols);
            assert_eq!(
                plan.invocation_text,
                "<app-heading [title]=\"title\" [fullName]=\"fullName()\"></app-heading>"
            );
            assert_eq!(plan.template_text, "<h1>{{ title }}: {{ fullName }}</h1>");
        }

        #[test]
        fn should_leave_calls_of_unnamed_callees_in_place() {
            let source = "<p [x]=\"items[f(x)]()\"></p>";
            let plan = extract_all(source, "Row", &NoSymbols);
            assert!(plan.invocation_text.contains("[items]=\"items\""));
            assert!(!plan.invocation_text.contains("[items["));
            assert!(!plan.class_text.contains("items["));
            assert_eq!(plan.template_text, "<p [x]=\"items[f]()\"></p>");
        }

        #[test]
        fn should_read_symbols_from_the_component_source() {
            let component = "export class HostComponent {\n  count = 0;\n  reset() {\n    this.count = 0;\n  }\n}\n";
            let symbols = SymbolTable::from_component_source(component);
            let source = "<input [(ngModel)]=\"count\"><button (click)=\"reset()\">Reset</button>";
            let plan = extract_all(source, "Counter", &symbols);
            assert_eq!(
                plan.invocation_text,
                "<app-counter [(count)]=\"count\" (reset)=\"reset()\"></app-counter>"
            );
            assert!(plan.class_text.contains("new EventEmitter<number>()"));
        }

        #[test]
        fn should_tolerate_errors_outside_the_fragment() {
            let source = "<p [title]=\"a = b\"></p><span>{{ ok }}</span>";
            let plan = extract(source, range(source, "<span>", "</span>"), "Ok", &NoSymbols).unwrap();
            assert_eq!(plan.invocation_text, "<app-ok [ok]=\"ok\"></app-ok>");
        }

        #[test]
        fn should_use_the_configured_names() {
            let config = ExtractConfig {
                selector_prefix: "acme".to_string(),
                template_file_suffix: ".html".to_string(),
                ..ExtractConfig::default()
            };
            let source = "<p>{{ total }}</p>";
            let plan = extract_selection(source, "TestComp", 0, source.len(), "price", &NoSymbols, &config).unwrap();
            assert_eq!(plan.selector, "acme-price");
            assert_eq!(plan.template_file_name, "price.html");
            assert!(plan.class_text.contains("  templateUrl: './price.html',\n"));
        }
    }

    mod consistency {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_declare_every_bound_input() {
            let source = "<p [title]=\"a + b\">{{ c }}</p><input [(ngModel)]=\"d\"><i>{{ a }}</i>";
            let plan = extract_all(source, "Mixed", &NoSymbols);
            let names: Vec<&str> = plan.inputs.iter().map(|field| field.field_name.as_str()).collect();
            assert_eq!(names, vec!["d", "a", "b", "c"]);
            for field in &plan.inputs {
                let attribute = if field.is_two_way {
                    format!("[({})]=\"{}\"", field.field_name, field.original_body)
                } else {
                    format!("[{}]=\"{}\"", field.field_name, field.original_body)
                };
                assert_eq!(plan.invocation_text.matches(&attribute).count(), 1, "{}", attribute);
                let declaration = format!("@Input() {};", field.field_name);
                assert_eq!(plan.class_text.matches(&declaration).count(), 1, "{}", declaration);
            }
        }

        #[test]
        fn should_serialize_the_plan() {
            let source = "<input [(ngModel)]=\"count\">";
            let plan = extract_all(source, "Counter", &SymbolTable::new().with_field("count", Some("number")));
            let json = serde_json::to_value(&plan).unwrap();
            assert_eq!(json["className"], "CounterComponent");
            assert_eq!(json["invocationText"], "<app-counter [(count)]=\"count\"></app-counter>");
            assert_eq!(json["inputs"][0]["fieldName"], "count");
            assert_eq!(json["inputs"][0]["fieldType"], "number");
            assert_eq!(json["inputs"][0]["isTwoWay"], true);
            assert_eq!(json["edit"]["span"]["start"], 0);
            assert_eq!(json["edit"]["span"]["end"], source.len());
        }
    }

    mod failures {
        use super::*;

        #[rstest]
        #[case("")]
        #[case("   ")]
        #[case("1Panel")]
        #[case("Name Label")]
        #[case("name-label")]
        fn should_reject_invalid_names(#[case] name: &str) {
            let source = "<p>{{ a }}</p>";
            assert!(matches!(
                extract(source, (0, source.len()), name, &NoSymbols),
                Err(ExtractError::InvalidComponentName { .. })
            ));
        }

        #[test]
        fn should_reject_empty_selections() {
            let source = "<div>\n   \n<p></p></div>";
            assert!(matches!(
                extract(source, (3, 3), "Panel", &NoSymbols),
                Err(ExtractError::EmptySelection)
            ));
            assert!(matches!(
                extract(source, (6, 9), "Panel", &NoSymbols),
                Err(ExtractError::EmptySelection)
            ));
        }

        #[test]
        fn should_reject_selections_ending_before_they_start() {
            let source = "<p>a</p><p>b</p>";
            assert!(matches!(
                extract(source, (10, 2), "Panel", &NoSymbols),
                Err(ExtractError::InvalidPosition)
            ));
        }

        #[test]
        fn should_reject_selections_across_levels() {
            let source = "<div><p>a</p></div><hr>";
            assert!(matches!(
                extract(source, range(source, "<p>", "<hr>"), "Panel", &NoSymbols),
                Err(ExtractError::InvalidPosition)
            ));
        }

        #[test]
        fn should_reject_parse_errors_inside_the_fragment() {
            let source = "<div><p [title]=\"a = b\"></p></div>";
            match extract(source, range(source, "<p", "</p>"), "Panel", &NoSymbols) {
                Err(ExtractError::Parse { message }) => {
                    assert!(message.starts_with("TestComp:"), "{}", message);
                    assert!(message.contains("Bindings cannot contain assignments"), "{}", message);
                }
                other => panic!("expected a parse error, got {:?}", other),
            }
        }

        #[test]
        fn should_reject_two_way_bindings_without_field() {
            let source = "<input [(ngModel)]=\"42\">";
            assert!(matches!(
                extract(source, (0, source.len()), "Answer", &NoSymbols),
                Err(ExtractError::TwoWayBindingWithoutField { .. })
            ));
        }

        #[test]
        fn should_reject_an_empty_fragment() {
            let template = parse_clean("<p></p>");
            assert!(matches!(
                extract_component(&template, &[], "Panel", &NoSymbols, &ExtractConfig::default()),
                Err(ExtractError::EmptySelection)
            ));
        }
    }
}
