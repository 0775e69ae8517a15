/// Fills `{{name}}` placeholders in a single pass.
///
/// Inserted values are never scanned again, and unknown placeholders are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            output.push_str(&rest[start..]);
            return output;
        };

        let key = after_open[..end].trim();
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_known_keys() {
        let filled = fill_template(
            "<title>{{title}}</title><main>{{ html }}</main>",
            &[("title", "Notes"), ("html", "<p>hi</p>")],
        );

        assert_eq!(filled, "<title>Notes</title><main><p>hi</p></main>");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let filled = fill_template("{{a}}|{{b}}", &[("a", "{{b}}"), ("b", "x")]);

        assert_eq!(filled, "{{b}}|x");
    }

    #[test]
    fn leaves_unknown_and_unterminated_placeholders() {
        assert_eq!(fill_template("{{nope}} {{open", &[]), "{{nope}} {{open");
    }
}
