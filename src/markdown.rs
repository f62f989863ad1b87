use pulldown_cmark::{html, Options, Parser};

/// Converts markdown to HTML, appending the result to `w`.
pub fn to_html(w: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    html::push_html(w, Parser::new_ext(markdown, options));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_html() {
        let mut html = String::new();
        to_html(&mut html, "Checks if *all* elements are equal.\n\n```js\nconst x = 1;\n```\n");
        assert_eq!(
            "<p>Checks if <em>all</em> elements are equal.</p>\n<pre><code class=\"language-js\">const x = 1;\n</code></pre>\n",
            html
        );
    }
}
