use semantic_locator::snapshot::{accessibility::AxNode, markup::MarkupElement};

/// `<html><body>...</body></html>` around the given children.
pub fn page(children: Vec<MarkupElement>) -> MarkupElement {
    let body = children
        .into_iter()
        .fold(MarkupElement::new("body"), |body, child| body.child(child));
    MarkupElement::new("html")
        .child(MarkupElement::new("head").child(MarkupElement::new("title").with_text("Login")))
        .child(body)
}

pub fn button(text: &str) -> MarkupElement {
    MarkupElement::new("button").with_text(text)
}

pub fn text_input(input_type: &str, placeholder: &str) -> MarkupElement {
    MarkupElement::new("input")
        .attr("type", input_type)
        .attr("placeholder", placeholder)
}

/// Heading and button that both read "Sign In".
pub fn sign_in_page() -> MarkupElement {
    page(vec![
        MarkupElement::new("h1").with_text("Sign In"),
        MarkupElement::new("form").child(button("Sign In").attr("type", "submit")),
    ])
}

/// Decorative "email" text next to the real email input.
pub fn email_page() -> MarkupElement {
    page(vec![
        MarkupElement::new("div").attr("class", "hint").with_text("email"),
        text_input("email", "Enter your email").attr("name", "email"),
    ])
}

pub fn ax(role: &str, name: &str) -> AxNode {
    AxNode::new(role, name)
}

pub fn heading(name: &str, level: u32) -> AxNode {
    let mut node = AxNode::new("heading", name);
    node.level = Some(level);
    node
}

pub fn disabled(mut node: AxNode) -> AxNode {
    node.disabled = true;
    node
}

pub fn ignored(mut node: AxNode) -> AxNode {
    node.ignored = true;
    node
}

/// Accessibility tree of a small login page.
pub fn ax_login_tree() -> AxNode {
    let mut email = ax("textbox", "Email");
    email.description = Some("you@example.com".into());
    email.required = true;

    ax("WebArea", "")
        .child(heading("Welcome", 2))
        .child(email)
        .child(ax("button", "Sign In"))
        .child(disabled(ax("button", "Delete account")))
        .child(ignored(ax("generic", "Tracking pixel")))
}
