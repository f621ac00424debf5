/**
 * Reference Classifier Tests
 *
 * Which references and calls of a bound expression are top-level.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{binding_expression, find_first, texts};
    use angular_refactor::extract::reference_classifier::{
        find_top_level_calls, find_top_level_reference, find_top_level_references, is_bindable_reference,
        is_component_expression_call,
    };
    use angular_refactor::template_ast::NodeKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    mod references {
        use super::*;
        use pretty_assertions::assert_eq;

        #[rstest]
        #[case("user", vec!["user"])]
        #[case("user.address.city", vec!["user"])]
        #[case("this.title", vec!["this.title"])]
        #[case("items[i].name", vec!["items", "i"])]
        #[case("a ? b : c", vec!["a", "b", "c"])]
        #[case("!visible", vec!["visible"])]
        #[case("{ active: isActive }", vec!["isActive"])]
        #[case("format(value)", vec![])]
        #[case("user.format(value)", vec!["user"])]
        #[case("a + format(value)", vec!["a", "format", "value"])]
        #[case("items | slice:0:limit", vec!["items", "limit"])]
        #[case("(total | currency:code) + fee", vec!["total", "code", "fee"])]
        fn should_find_top_level_references(#[case] expression: &str, #[case] expected: Vec<&str>) {
            let (template, root) = binding_expression(expression);
            let references = find_top_level_references(&template, root);
            assert_eq!(texts(&template, &references), expected);
        }

        #[test]
        fn should_map_every_link_of_a_chain_to_its_receiver() {
            let (template, root) = binding_expression("user.address.city");
            let receiver = find_first(&template, |kind| matches!(kind, NodeKind::Reference { name } if name == "user"));
            for node in template.descendants(root) {
                if template.kind(node).is_reference() {
                    assert_eq!(find_top_level_reference(&template, node), Some(receiver));
                }
            }
        }

        #[test]
        fn should_never_return_pipe_names() {
            let (template, _) = binding_expression("value | date");
            let pipe = find_first(&template, |kind| kind.is_pipe_reference());
            assert_eq!(find_top_level_reference(&template, pipe), None);
        }
    }

    mod calls {
        use super::*;
        use pretty_assertions::assert_eq;

        #[rstest]
        #[case("save()", vec!["save()"])]
        #[case("a.b.c()", vec!["a.b.c()"])]
        #[case("first() + second()", vec!["first()", "second()"])]
        #[case("outer(inner(x))", vec!["outer(inner(x))"])]
        #[case("load().then(done)", vec!["load()"])]
        #[case("items | slice:0:count()", vec!["count()"])]
        #[case("user.name", vec![])]
        fn should_find_top_level_calls(#[case] expression: &str, #[case] expected: Vec<&str>) {
            let (template, root) = binding_expression(expression);
            let calls = find_top_level_calls(&template, root);
            assert_eq!(texts(&template, &calls), expected);
        }
    }

    mod component_calls {
        use super::*;

        #[test]
        fn should_treat_leading_calls_as_component_calls() {
            let (template, _) = binding_expression("format(value)");
            let call = find_first(&template, |kind| kind.is_call());
            let arguments = find_first(&template, |kind| matches!(kind, NodeKind::ArgumentList));
            assert!(is_component_expression_call(&template, call));
            assert!(is_component_expression_call(&template, arguments));
        }

        #[test]
        fn should_treat_calls_after_an_operator_as_extractable() {
            let (template, _) = binding_expression("prefix + format(value)");
            let call = find_first(&template, |kind| kind.is_call());
            assert!(!is_component_expression_call(&template, call));
        }

        #[test]
        fn should_accept_pipe_arguments_as_bindable() {
            let (template, _) = binding_expression("value | round:digits");
            let digits = find_first(&template, |kind| matches!(kind, NodeKind::Reference { name } if name == "digits"));
            assert!(is_bindable_reference(&template, digits));
        }

        #[test]
        fn should_reject_non_references() {
            let (template, root) = binding_expression("1 + 2");
            assert!(!is_bindable_reference(&template, root));
        }
    }
}
