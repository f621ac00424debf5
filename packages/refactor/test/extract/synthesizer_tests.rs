/**
 * Component Synthesizer Tests
 *
 * Rendering of the invocation tag, the component class and the component
 * template from scanned fragments.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::parse_clean;
    use angular_refactor::extract::synthesizer::{named_events, rendering_order, shadowed_events};
    use angular_refactor::extract::{
        ComponentSynthesizer, FragmentScanner, NoSymbols, ScanResult, SymbolResolver, SymbolTable,
    };
    use angular_refactor::template_ast::{NodeId, Span, Template};
    use angular_refactor::ExtractConfig;
    use pretty_assertions::assert_eq;

    struct Fixture {
        template: Template,
        roots: Vec<NodeId>,
        scan: ScanResult,
    }

    fn fixture(html: &str, resolver: &dyn SymbolResolver) -> Fixture {
        let template = parse_clean(html);
        let roots = template.children(template.root()).to_vec();
        let scan = FragmentScanner::scan(&template, &roots, resolver);
        Fixture { template, roots, scan }
    }

    impl Fixture {
        fn tag(&self, config: &ExtractConfig, kebab: &str) -> String {
            ComponentSynthesizer::new(&self.template, config).render_invocation_tag(
                kebab,
                &self.scan.bindings,
                &self.scan.events,
            )
        }

        fn class(&self, config: &ExtractConfig, class_name: &str, kebab: &str) -> String {
            ComponentSynthesizer::new(&self.template, config).render_class_body(
                class_name,
                kebab,
                &self.scan.bindings,
                &self.scan.events,
            )
        }

        fn component_template(&self, config: &ExtractConfig) -> String {
            ComponentSynthesizer::new(&self.template, config)
                .render_replacement_template(&self.roots, &self.scan.bindings)
                .unwrap()
        }
    }

    mod invocation_tag {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_render_an_empty_tag_without_bindings() {
            let fixture = fixture("<p>Hello</p>", &NoSymbols);
            assert_eq!(fixture.tag(&ExtractConfig::default(), "greeting"), "<app-greeting></app-greeting>");
        }

        #[test]
        fn should_put_two_way_bindings_first() {
            let fixture = fixture("<p>{{ title }}</p><input [(ngModel)]=\"query\">", &NoSymbols);
            assert_eq!(
                fixture.tag(&ExtractConfig::default(), "search"),
                "<app-search [(query)]=\"query\" [title]=\"title\"></app-search>"
            );
        }

        #[test]
        fn should_bind_each_field_once() {
            let fixture = fixture("<p>{{ user.name }}</p><p [title]=\"user.email\"></p>", &NoSymbols);
            assert_eq!(
                fixture.tag(&ExtractConfig::default(), "user-card"),
                "<app-user-card [user]=\"user\"></app-user-card>"
            );
        }

        #[test]
        fn should_pass_calls_by_their_original_text() {
            let fixture = fixture("<p [title]='format(\"long\")'></p>", &NoSymbols);
            assert_eq!(
                fixture.tag(&ExtractConfig::default(), "label"),
                "<app-label [format]='format(\"long\")'></app-label>"
            );
        }

        #[test]
        fn should_report_handlers_shadowed_by_an_earlier_name() {
            let fixture = fixture("<input (click)=\"save(a)\" (blur)=\"save(b)\">", &NoSymbols);
            let shadowed = shadowed_events(&fixture.template, &fixture.scan.events);
            assert_eq!(shadowed.len(), 1);
            assert_eq!(shadowed[0].1, "save");
            assert_eq!(fixture.template.text(shadowed[0].0.action()), "save(b)");
            assert_eq!(
                fixture.tag(&ExtractConfig::default(), "saver"),
                "<app-saver (save)=\"save(a)\"></app-saver>"
            );
        }

        #[test]
        fn should_forward_named_events_once() {
            let fixture = fixture(
                "<button (click)=\"save()\">A</button><button (click)=\"save()\">B</button><i (click)=\"open = true\"></i>",
                &NoSymbols,
            );
            assert_eq!(fixture.scan.events.len(), 3);
            assert_eq!(named_events(&fixture.scan.events).len(), 1);
            assert!(shadowed_events(&fixture.template, &fixture.scan.events).is_empty());
            assert_eq!(
                fixture.tag(&ExtractConfig::default(), "saver"),
                "<app-saver (save)=\"save()\"></app-saver>"
            );
        }

        #[test]
        fn should_use_the_configured_prefix() {
            let config = ExtractConfig {
                selector_prefix: "acme".to_string(),
                ..ExtractConfig::default()
            };
            let fixture = fixture("<p>{{ total }}</p>", &NoSymbols);
            assert_eq!(fixture.tag(&config, "price"), "<acme-price [total]=\"total\"></acme-price>");
        }
    }

    mod class_body {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_render_an_empty_class() {
            let fixture = fixture("<p>Hello</p>", &NoSymbols);
            let expected = "\
import { Component } from '@angular/core';

@Component({
  selector: 'app-greeting',
  templateUrl: './greeting.component.html',
  styles: []
})
export class GreetingComponent {
}
";
            assert_eq!(fixture.class(&ExtractConfig::default(), "GreetingComponent", "greeting"), expected);
        }

        #[test]
        fn should_declare_typed_inputs() {
            let symbols = SymbolTable::new().with_field("user", Some("User"));
            let fixture = fixture("<span [title]=\"user.name\">{{ caption }}</span>", &symbols);
            let expected = "\
import { Component, Input } from '@angular/core';

@Component({
  selector: 'app-name-label',
  templateUrl: './name-label.component.html',
  styles: []
})
export class NameLabelComponent {
  @Input() user: User;
  @Input() caption;
}
";
            assert_eq!(fixture.class(&ExtractConfig::default(), "NameLabelComponent", "name-label"), expected);
        }

        #[test]
        fn should_declare_change_emitters_and_event_outputs() {
            let symbols = SymbolTable::new().with_field("count", Some("number"));
            let fixture = fixture(
                "<input [(ngModel)]=\"count\"><button (click)=\"save()\">Save</button>",
                &symbols,
            );
            let expected = "\
import { Component, Input, Output, EventEmitter } from '@angular/core';

@Component({
  selector: 'app-counter',
  templateUrl: './counter.component.html',
  styles: []
})
export class CounterComponent {
  @Output() countChange = new EventEmitter<number>();
  @Input() count: number;
  @Output(\"save\") saveEvent = new EventEmitter<void>();
  save() {
    this.saveEvent.emit();
  }
}
";
            assert_eq!(fixture.class(&ExtractConfig::default(), "CounterComponent", "counter"), expected);
        }

        #[test]
        fn should_import_outputs_for_events_alone() {
            let fixture = fixture("<button (click)=\"close()\"></button>", &NoSymbols);
            let class = fixture.class(&ExtractConfig::default(), "CloserComponent", "closer");
            assert!(class.starts_with("import { Component, Output, EventEmitter } from '@angular/core';\n"));
        }

        #[test]
        fn should_fall_back_to_the_unknown_type() {
            let config = ExtractConfig {
                unknown_type: "unknown".to_string(),
                indent: "    ".to_string(),
                ..ExtractConfig::default()
            };
            let fixture = fixture("<input [(ngModel)]=\"query\">", &NoSymbols);
            let class = fixture.class(&config, "SearchComponent", "search");
            assert!(class.contains("\n    @Output() queryChange = new EventEmitter<unknown>();\n    @Input() query;\n"));
        }

        #[test]
        fn should_list_the_same_fields_as_the_tag() {
            let symbols = SymbolTable::new().with_field("a", Some("string"));
            let fixture = fixture("<p [title]=\"a + b\">{{ c }}</p><input [(ngModel)]=\"d\">", &symbols);
            let names: Vec<&str> = rendering_order(&fixture.scan.bindings)
                .into_iter()
                .map(|field| field.field_name.as_str())
                .collect();
            assert_eq!(names, vec!["d", "a", "b", "c"]);

            let tag = fixture.tag(&ExtractConfig::default(), "mixed");
            let class = fixture.class(&ExtractConfig::default(), "MixedComponent", "mixed");
            let mut tag_cursor = 0;
            let mut class_cursor = 0;
            for name in names {
                let in_tag = tag[tag_cursor..].find(&format!("=\"{}\"", name)).unwrap();
                tag_cursor += in_tag + 1;
                let in_class = class[class_cursor..].find(&format!("@Input() {}", name)).unwrap();
                class_cursor += in_class + 1;
            }
        }
    }

    mod component_template {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_copy_plain_markup() {
            let fixture = fixture("<p>Hello <b>world</b></p><hr>", &NoSymbols);
            assert_eq!(fixture.component_template(&ExtractConfig::default()), "<p>Hello <b>world</b></p><hr>");
        }

        #[test]
        fn should_replace_calls_with_their_field() {
            let fixture = fixture("<p>{{ fullName() }}</p>", &NoSymbols);
            assert_eq!(fixture.component_template(&ExtractConfig::default()), "<p>{{ fullName }}</p>");
        }

        #[test]
        fn should_forward_two_way_changes() {
            let fixture = fixture("<input [(ngModel)]=\"count\">", &NoSymbols);
            assert_eq!(
                fixture.component_template(&ExtractConfig::default()),
                "<input [(ngModel)]=\"count\" (ngModelChange)=\"countChange.emit($event)\">"
            );
        }

        #[test]
        fn should_keep_event_handlers() {
            let fixture = fixture("<button (click)=\"save()\">{{ label }}</button>", &NoSymbols);
            assert_eq!(
                fixture.component_template(&ExtractConfig::default()),
                "<button (click)=\"save()\">{{ label }}</button>"
            );
        }

        #[test]
        fn should_span_all_roots() {
            let fixture = fixture("<p>a</p>\n<p>b</p>", &NoSymbols);
            let config = ExtractConfig::default();
            let synthesizer = ComponentSynthesizer::new(&fixture.template, &config);
            assert_eq!(synthesizer.fragment_span(&fixture.roots), Some(Span::new(0, 17)));
            assert_eq!(synthesizer.fragment_span(&[]), None);
        }
    }
}
