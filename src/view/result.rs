use crate::model::ModelMap;
use serde_json::Value;

/// What a handler asks the dispatcher to send back.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResult {
    /// Render the logical view `view` with `model`.
    Render { view: String, model: ModelMap },
    /// Send the client elsewhere. No template lookup happens.
    Redirect(Redirect),
    /// Serialize `body` as JSON with `status`.
    Json { status: u16, body: Value },
}

impl ViewResult {
    #[must_use]
    pub fn render(view: impl Into<String>, model: ModelMap) -> Self {
        ViewResult::Render {
            view: view.into(),
            model,
        }
    }

    /// Render `view` with an empty model.
    #[must_use]
    pub fn view(view: impl Into<String>) -> Self {
        Self::render(view, ModelMap::new())
    }

    #[must_use]
    pub fn redirect(target: impl Into<String>) -> Self {
        ViewResult::Redirect(Redirect::to(target))
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        ViewResult::Json { status, body }
    }

    #[must_use]
    pub fn view_name(&self) -> Option<&str> {
        match self {
            ViewResult::Render { view, .. } => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn model(&self) -> Option<&ModelMap> {
        match self {
            ViewResult::Render { model, .. } => Some(model),
            _ => None,
        }
    }
}

impl From<Redirect> for ViewResult {
    fn from(r: Redirect) -> Self {
        ViewResult::Redirect(r)
    }
}

/// Redirect target plus attributes.
///
/// An attribute whose name appears as `{name}` in the target is substituted
/// into it (percent-encoded). Every other attribute is appended to the query
/// string, in insertion order. Placeholders without a matching attribute are
/// left as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    target: String,
    attributes: Vec<(String, String)>,
}

impl Redirect {
    #[must_use]
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The final `Location` value.
    #[must_use]
    pub fn location(&self) -> String {
        let mut used = vec![false; self.attributes.len()];
        let mut out = String::with_capacity(self.target.len() + 16);
        let mut rest = self.target.as_str();

        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open..].find('}') else {
                break;
            };
            let close = open + len;
            let name = &rest[open + 1..close];
            out.push_str(&rest[..open]);
            match self.attributes.iter().position(|(k, _)| k == name) {
                Some(idx) => {
                    used[idx] = true;
                    out.push_str(&urlencoding::encode(&self.attributes[idx].1));
                }
                None => out.push_str(&rest[open..=close]),
            }
            rest = &rest[close + 1..];
        }
        out.push_str(rest);

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for ((k, v), _) in self.attributes.iter().zip(&used).filter(|(_, u)| !**u) {
            query.append_pair(k, v);
            any = true;
        }
        if any {
            out.push(if out.contains('?') { '&' } else { '?' });
            out.push_str(&query.finish());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_then_query() {
        let r = Redirect::to("/validation/v1/items/{itemId}")
            .attribute("itemId", 3)
            .attribute("status", true);
        assert_eq!(r.location(), "/validation/v1/items/3?status=true");
    }

    #[test]
    fn test_placeholder_is_encoded() {
        let r = Redirect::to("/members/{name}").attribute("name", "a b/c");
        assert_eq!(r.location(), "/members/a%20b%2Fc");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let r = Redirect::to("/items/{itemId}");
        assert_eq!(r.location(), "/items/{itemId}");
    }

    #[test]
    fn test_existing_query_is_extended() {
        let r = Redirect::to("/search?q=x").attribute("page", 2);
        assert_eq!(r.location(), "/search?q=x&page=2");
    }

    #[test]
    fn test_accessors() {
        let v = ViewResult::view("new-form");
        assert_eq!(v.view_name(), Some("new-form"));
        assert!(v.model().is_some_and(ModelMap::is_empty));
        assert_eq!(ViewResult::redirect("/x").view_name(), None);
    }
}
