/// Substitute `{first}` and `{second}` in `template`
///
/// Single pass, so placeholder text inside the submitted values stays literal.
pub fn compose_sentence(template: &str, first: &str, second: &str) -> String {
    let mut out = String::with_capacity(template.len() + first.len() + second.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix("{first}") {
            out.push_str(first);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{second}") {
            out.push_str(second);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}
