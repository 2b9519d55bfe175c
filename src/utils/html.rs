/// Sanitizes author-supplied rich text (quiz descriptions) with ammonia's
/// whitelist: formatting tags such as `<b>` and `<p>` survive, `<script>`
/// (including its body), `<iframe>` and event-handler attributes are dropped.
///
/// Question and option texts are stored verbatim; only descriptions are
/// rendered as markup by the client.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
