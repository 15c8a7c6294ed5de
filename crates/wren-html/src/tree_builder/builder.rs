use core::fmt;
use std::borrow::Cow;

use strum::EnumCount as _;
use strum_macros::{Display, EnumCount};
use tracing::{debug, trace};
use wren_arena::{Arena, ArenaConfig, ArenaKind, Span};
use wren_common::warning::warn_once;
use wren_dom::{
    Attribute, DomTables, DomTree, ElementData, ElementIndex, Node, NodeId, NodeKind, TextData,
    TextIndex,
};

use super::stack::OpenElementStack;
use crate::tokenizer::token::one_of;
use crate::tokenizer::{Token, TokenStream};

/// Component name used for deduplicated warnings.
const COMPONENT: &str = "HTML Tree Builder";

/// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "nextid", "option", "p", "rb", "rp", "rt", "rtc",
];

/// Elements that stop a "has an element in scope" walk.
const SCOPE_BOUNDARIES: &[&str] = &["html", "table", "th", "td"];

/// End tags that behave like "anything else" before the body exists.
const STRUCTURAL_END_TAGS: &[&str] = &["head", "body", "html", "br"];

/// Start tags that close a `<p>` sitting on top of the stack.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// Heading start tags close a `<p>` anywhere in scope.
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// `Initial` and `Text` are named for completeness but no transition leads
/// to them; the builder panics if it ever finds itself in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recovered problem in the token stream. The builder never fails; it
/// records these and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong and what the builder did about it.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
    /// False for tokens that were dropped without being malformed, such as
    /// content after `</html>`.
    pub is_error: bool,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.is_error { "error" } else { "warning" };
        write!(f, "token {}: {severity}: {}", self.token_index, self.message)
    }
}

/// Whether a mode handler is done with the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Consumed,
    Reprocess,
}

/// What went wrong, without the names taken from the source. Used as the
/// deduplicated warning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum IssueKind {
    #[strum(to_string = "end tag before <html> ignored")]
    EndTagBeforeHtml,
    #[strum(to_string = "duplicate <html> start tag ignored")]
    DuplicateHtml,
    #[strum(to_string = "end tag before <head> ignored")]
    EndTagBeforeHead,
    #[strum(to_string = "duplicate <head> start tag ignored")]
    DuplicateHead,
    #[strum(to_string = "end tag in <head> ignored")]
    EndTagInHead,
    #[strum(to_string = "end tag after </head> ignored")]
    EndTagAfterHead,
    #[strum(to_string = "html, head or body start tag inside <body> ignored")]
    StructureInBody,
    #[strum(to_string = "</body> without an open <body> ignored")]
    BodyNotInScope,
    #[strum(to_string = "</html> with elements still open ignored")]
    HtmlNotCurrent,
    #[strum(to_string = "end tag does not match the current node")]
    MismatchedEndTag,
    #[strum(to_string = "token after </body> ignored")]
    AfterBody,
    #[strum(to_string = "token after </html> dropped")]
    AfterHtml,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from a [`TokenStream`] with a reduced set of
/// insertion modes. The resulting tree always has an `html` root with a
/// `head` and a `body` child, whatever the input looked like.
///
/// Nodes are appended to flat tables as they are created. An element's
/// children are collected while it sits on the stack of open elements and
/// copied into one contiguous span when it is popped.
pub struct TreeBuilder<'a, 'src> {
    tokens: &'a TokenStream<'src>,
    mode: InsertionMode,
    stack: OpenElementStack,

    nodes: Arena<Node>,
    element_data: Arena<ElementData<'src>>,
    text_data: Arena<TextData<'src>>,
    sealed_children: Arena<NodeId>,

    html: Option<NodeId>,
    head: Option<NodeId>,

    token_index: usize,
    issues: Vec<ParseIssue>,
}

impl<'a, 'src> TreeBuilder<'a, 'src> {
    /// Create a builder over `tokens` with default arena sizing.
    #[must_use]
    pub fn new(tokens: &'a TokenStream<'src>) -> Self {
        Self::with_config(tokens, ArenaConfig::default())
    }

    /// Create a builder whose node tables and open-element stack use `config`.
    #[must_use]
    pub fn with_config(tokens: &'a TokenStream<'src>, config: ArenaConfig) -> Self {
        Self {
            tokens,
            mode: InsertionMode::BeforeHtml,
            stack: OpenElementStack::new(config),
            nodes: Arena::new(ArenaKind::Permanent, config),
            element_data: Arena::new(ArenaKind::Permanent, config),
            text_data: Arena::new(ArenaKind::Permanent, config),
            sealed_children: Arena::new(ArenaKind::Permanent, config),
            html: None,
            head: None,
            token_index: 0,
            issues: Vec::new(),
        }
    }

    /// Current insertion mode.
    #[must_use]
    pub const fn mode(&self) -> InsertionMode {
        self.mode
    }

    /// Consume every token and return the finished tree.
    ///
    /// # Panics
    ///
    /// Panics if an internal invariant breaks, such as popping an empty
    /// stack of open elements.
    #[must_use]
    pub fn build(self) -> DomTree<'src> {
        self.build_with_issues().0
    }

    /// Consume every token and return the finished tree together with every
    /// parse issue recorded on the way.
    ///
    /// # Panics
    ///
    /// See [`Self::build`].
    #[must_use]
    pub fn build_with_issues(mut self) -> (DomTree<'src>, Vec<ParseIssue>) {
        self.run_tokens();
        self.finish();

        debug!(
            nodes = self.nodes.len(),
            elements = self.element_data.len(),
            texts = self.text_data.len(),
            issues = self.issues.len(),
            "built dom tree"
        );

        let issues = std::mem::take(&mut self.issues);
        (self.seal(), issues)
    }

    /// Drive every token through the mode handlers. A handler asks for a
    /// token to be reprocessed after switching modes; the index only moves
    /// on once a handler consumes the token.
    fn run_tokens(&mut self) {
        let tokens = self.tokens;
        while let Some(&token) = tokens.get(self.token_index) {
            let mut passes = 0;
            while self.process_token(token) == Step::Reprocess {
                passes += 1;
                assert!(
                    passes < InsertionMode::COUNT,
                    "token {} reprocessed {passes} times without being consumed",
                    self.token_index
                );
            }
            self.token_index += 1;
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// # Panics
    ///
    /// Panics in a mode no transition can reach.
    fn process_token(&mut self, token: Token<'src>) -> Step {
        match self.mode {
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::Initial | InsertionMode::Text => {
                panic!("insertion mode {} is not supported", self.mode)
            }
        }
    }

    fn switch_to(&mut self, mode: InsertionMode) {
        trace!(from = %self.mode, to = %mode, token = self.token_index, "switch insertion mode");
        self.mode = mode;
    }

    // =========================================================================
    // Insertion modes
    // =========================================================================

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            // "A start tag whose tag name is "html""
            // "Create an element for the token... Put this element in the stack
            // of open elements. Switch the insertion mode to "before head"."
            Token::OpenTag {
                name, attributes, ..
            } if is_named(name, "html") => {
                self.insert_html(name, attributes);
                self.switch_to(InsertionMode::BeforeHead);
                Step::Consumed
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::CloseTag { name } if !one_of(name, STRUCTURAL_END_TAGS) => {
                self.parse_error(
                    IssueKind::EndTagBeforeHtml,
                    format!("unexpected </{}> before <html>", lossy(name)),
                );
                Step::Consumed
            }

            // "Anything else"
            // "Create an html element... Switch the insertion mode to "before
            // head", then reprocess the token."
            _ => {
                self.insert_html(b"html", Span::EMPTY);
                self.switch_to(InsertionMode::BeforeHead);
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element pointer
            // to the newly created head element. Switch the insertion mode to
            // "in head"."
            Token::OpenTag {
                name, attributes, ..
            } if is_named(name, "head") => {
                self.insert_head(name, attributes);
                self.switch_to(InsertionMode::InHead);
                Step::Consumed
            }

            Token::OpenTag { name, .. } if is_named(name, "html") => {
                self.parse_error(IssueKind::DuplicateHtml, IssueKind::DuplicateHtml.to_string());
                Step::Consumed
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::CloseTag { name } if !one_of(name, STRUCTURAL_END_TAGS) => {
                self.parse_error(
                    IssueKind::EndTagBeforeHead,
                    format!("unexpected </{}> before <head>", lossy(name)),
                );
                Step::Consumed
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no
            // attributes... Switch the insertion mode to "in head".
            // Reprocess the current token."
            _ => {
                self.insert_head(b"head", Span::EMPTY);
                self.switch_to(InsertionMode::InHead);
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// Nothing is inserted into the head. The first open tag or text closes
    /// it, so `<title>` and friends end up in the body.
    fn handle_in_head_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            Token::OpenTag { name, .. } if is_named(name, "head") => {
                self.parse_error(IssueKind::DuplicateHead, IssueKind::DuplicateHead.to_string());
                Step::Consumed
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements. Switch the insertion mode to "after head"."
            Token::CloseTag { name } if is_named(name, "head") => {
                self.close_head();
                Step::Consumed
            }

            Token::CloseTag { name } => {
                if !is_named(name, "html") {
                    self.parse_error(
                        IssueKind::EndTagInHead,
                        format!("unexpected </{}> in <head>", lossy(name)),
                    );
                }
                Step::Consumed
            }

            // "Anything else"
            // "Pop the current node... Switch the insertion mode to "after
            // head". Reprocess the token."
            Token::OpenTag { .. } | Token::Text { .. } => {
                self.close_head();
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token... Switch the insertion mode
            // to "in body"."
            Token::OpenTag {
                name, attributes, ..
            } if is_named(name, "body") => {
                self.insert_body(name, attributes);
                self.switch_to(InsertionMode::InBody);
                Step::Consumed
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::CloseTag { name } if !one_of(name, &["body", "html", "br"]) => {
                self.parse_error(
                    IssueKind::EndTagAfterHead,
                    format!("unexpected </{}> after </head>", lossy(name)),
                );
                Step::Consumed
            }

            // "Anything else"
            // "Insert an HTML element for a "body" start tag token with no
            // attributes. Switch the insertion mode to "in body". Reprocess
            // the current token."
            _ => {
                self.insert_body(b"body", Span::EMPTY);
                self.switch_to(InsertionMode::InBody);
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_in_body_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            // "Any other character token"
            // "Insert the token's character."
            Token::Text { contents } => {
                self.insert_text(contents);
                Step::Consumed
            }

            // The document structure is already in place; a second html, head
            // or body would break it.
            Token::OpenTag { name, .. } if one_of(name, &["html", "head", "body"]) => {
                self.parse_error(
                    IssueKind::StructureInBody,
                    format!("<{}> inside <body> ignored", lossy(name)),
                );
                Step::Consumed
            }

            Token::OpenTag {
                name,
                attributes,
                self_closing,
            } => {
                self.handle_in_body_start_tag(name, attributes, self_closing);
                Step::Consumed
            }

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Otherwise... Switch the insertion mode to "after body"."
            Token::CloseTag { name } if is_named(name, "body") => {
                if self.has_element_in_scope("body") {
                    self.pop_until("body");
                    self.switch_to(InsertionMode::AfterBody);
                } else {
                    self.parse_error(
                        IssueKind::BodyNotInScope,
                        IssueKind::BodyNotInScope.to_string(),
                    );
                }
                Step::Consumed
            }

            Token::CloseTag { name } if is_named(name, "html") => {
                if self.current_node_is(b"html") {
                    let _ = self.pop();
                    self.switch_to(InsertionMode::AfterBody);
                    Step::Reprocess
                } else {
                    self.parse_error(
                        IssueKind::HtmlNotCurrent,
                        IssueKind::HtmlNotCurrent.to_string(),
                    );
                    Step::Consumed
                }
            }

            // "Any other end tag"
            Token::CloseTag { name } => {
                // "Generate implied end tags, except for HTML elements with the
                // same tag name as the token."
                self.generate_implied_end_tags(Some(name));

                // "If node is not the current node, then this is a parse error."
                if self.current_node_is(name) {
                    let _ = self.pop();
                } else {
                    self.parse_error(
                        IssueKind::MismatchedEndTag,
                        format!("</{}> does not match the current node", lossy(name)),
                    );
                }
                Step::Consumed
            }
        }
    }

    fn handle_in_body_start_tag(
        &mut self,
        name: &'src [u8],
        attributes: Span<Attribute<'src>>,
        self_closing: bool,
    ) {
        // Only a <p> that is the current node gets closed here, not one
        // further down in button scope.
        if one_of(name, CLOSES_P) && self.current_node_is(b"p") {
            let _ = self.pop();
        }

        if one_of(name, HEADINGS) && self.has_element_in_scope("p") {
            self.pop_until("p");
        }

        if one_of(name, &["dd", "dt"]) {
            self.close_definition_item();
        }

        let element = self.insert_element(name, attributes, self_closing);
        if !self_closing {
            self.stack.push(element);
        }
    }

    /// A new `<dd>` or `<dt>` closes the item it follows. A `<p>` left open
    /// inside that item is closed first.
    fn close_definition_item(&mut self) {
        loop {
            let Some(current) = self.stack.current_node() else {
                return;
            };
            let name = self.name_of(current);
            if one_of(name, &["dd", "dt"]) {
                self.generate_implied_end_tags(Some(name));
                self.pop_until_named(name);
                break;
            }
            if !name.eq_ignore_ascii_case(b"p") {
                break;
            }
            let _ = self.pop();
        }

        if self.current_node_is(b"p") {
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: Token<'src>) -> Step {
        match token {
            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after body"."
            Token::CloseTag { name } if is_named(name, "html") => {
                self.switch_to(InsertionMode::AfterAfterBody);
            }
            _ => {
                self.parse_error(
                    IssueKind::AfterBody,
                    format!("{} after </body> ignored", token.kind()),
                );
            }
        }
        Step::Consumed
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: Token<'src>) -> Step {
        self.parse_warning(
            IssueKind::AfterHtml,
            format!("{} after </html> dropped", token.kind()),
        );
        Step::Consumed
    }

    /// [§ 13.2.6.5 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// Create whatever part of `html`, `head` and `body` the tokens never
    /// produced, then "pop all the nodes off the stack of open elements".
    fn finish(&mut self) {
        loop {
            match self.mode {
                InsertionMode::BeforeHtml => {
                    self.insert_html(b"html", Span::EMPTY);
                    self.switch_to(InsertionMode::BeforeHead);
                }
                InsertionMode::BeforeHead => {
                    self.insert_head(b"head", Span::EMPTY);
                    self.switch_to(InsertionMode::InHead);
                }
                InsertionMode::InHead => self.close_head(),
                InsertionMode::AfterHead => {
                    self.insert_body(b"body", Span::EMPTY);
                    self.switch_to(InsertionMode::InBody);
                }
                _ => break,
            }
        }

        while !self.stack.is_empty() {
            let _ = self.pop();
        }
    }

    fn seal(self) -> DomTree<'src> {
        let Some(html) = self.html else {
            panic!("tree builder finished without an html element");
        };
        DomTree::from_tables(
            DomTables {
                nodes: self.nodes.as_slice(),
                element_data: self.element_data.as_slice(),
                text_data: self.text_data.as_slice(),
                children: self.sealed_children.as_slice(),
                attributes: self.tokens.attribute_pool(),
            },
            html,
            self.head,
        )
    }

    // =========================================================================
    // Parse issues
    // =========================================================================

    fn parse_error(&mut self, kind: IssueKind, message: String) {
        self.record_issue(kind, message, true);
    }

    fn parse_warning(&mut self, kind: IssueKind, message: String) {
        self.record_issue(kind, message, false);
    }

    /// The issue keeps the detailed message. The log only hears about each
    /// kind once, so source tag names never reach the global warning set.
    fn record_issue(&mut self, kind: IssueKind, message: String, is_error: bool) {
        warn_once(COMPONENT, &kind.to_string());
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
            is_error,
        });
    }

    // =========================================================================
    // Stack of open elements
    // =========================================================================

    /// Tag name of an element on the stack.
    fn name_of(&self, node: NodeId) -> &'src [u8] {
        match self.nodes.at(node.0).kind {
            NodeKind::Element(index) => self.element_data.at(index.0).name,
            NodeKind::Text(_) => panic!("open element {node:?} is a text node"),
        }
    }

    fn current_node_is(&self, name: &[u8]) -> bool {
        self.stack
            .current_node()
            .is_some_and(|node| self.name_of(node).eq_ignore_ascii_case(name))
    }

    /// Pop the current node and give it its final children span.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    fn pop(&mut self) -> NodeId {
        let sealed_children = &mut self.sealed_children;
        let Some((node, sealed)) = self
            .stack
            .pop_with(|node, children| (node, sealed_children.alloc_copy(children)))
        else {
            panic!("pop on an empty stack of open elements");
        };
        self.nodes.at_mut(node.0).children = sealed;
        trace!(?node, children = sealed.len(), "pop open element");
        node
    }

    /// Pop elements until one named `name` has been popped.
    fn pop_until(&mut self, name: &str) {
        self.pop_until_named(name.as_bytes());
    }

    fn pop_until_named(&mut self, name: &[u8]) {
        loop {
            let node = self.pop();
            if self.name_of(node).eq_ignore_ascii_case(name) {
                break;
            }
        }
    }

    /// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "If a step requires the user agent to generate implied end tags but lists
    /// an element to exclude from the process, then the user agent must perform
    /// the above steps as if that element was not in the above list."
    fn generate_implied_end_tags(&mut self, exclude: Option<&[u8]>) {
        while let Some(current) = self.stack.current_node() {
            let name = self.name_of(current);
            let excluded = exclude.is_some_and(|exclude| name.eq_ignore_ascii_case(exclude));
            if excluded || !one_of(name, IMPLIED_END_TAGS) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    ///
    /// Scope markers: html, table, td, th.
    ///
    /// # Panics
    ///
    /// Panics if the walk runs off the bottom of the stack, which means there
    /// is no `html` element open.
    fn has_element_in_scope(&self, name: &str) -> bool {
        for node in self.stack.iter_from_current() {
            let tag = self.name_of(node);
            if tag.eq_ignore_ascii_case(name.as_bytes()) {
                return true;
            }
            if one_of(tag, SCOPE_BOUNDARIES) {
                return false;
            }
        }
        panic!("scope check for <{name}> found no html element on the stack");
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    fn create_element(
        &mut self,
        name: &'src [u8],
        attributes: Span<Attribute<'src>>,
        self_closing: bool,
    ) -> NodeId {
        let node = NodeId(self.nodes.len());
        let index = self.element_data.push(ElementData {
            node,
            name,
            attributes,
            self_closing,
        });
        let _ = self.nodes.push(Node::new(NodeKind::Element(ElementIndex(index))));
        node
    }

    /// Make `node` the last child of the current node and link it to its
    /// previous sibling.
    fn attach(&mut self, node: NodeId) {
        let Some(parent) = self.stack.current_node() else {
            panic!("inserting {node:?} with no open element");
        };
        let previous = self.stack.append_child(node);

        let record = self.nodes.at_mut(node.0);
        record.parent = Some(parent);
        record.prev_sibling = previous;
        if let Some(previous) = previous {
            self.nodes.at_mut(previous.0).next_sibling = Some(node);
        }
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    fn insert_element(
        &mut self,
        name: &'src [u8],
        attributes: Span<Attribute<'src>>,
        self_closing: bool,
    ) -> NodeId {
        let node = self.create_element(name, attributes, self_closing);
        self.attach(node);
        node
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Each text token becomes its own node; adjacent runs are not merged.
    fn insert_text(&mut self, contents: &'src [u8]) {
        let node = NodeId(self.nodes.len());
        let index = self.text_data.push(TextData { node, contents });
        let _ = self.nodes.push(Node::new(NodeKind::Text(TextIndex(index))));
        self.attach(node);
    }

    /// The root. It has no parent and is never a self-closing element.
    fn insert_html(&mut self, name: &'src [u8], attributes: Span<Attribute<'src>>) {
        assert!(self.html.is_none(), "html element created twice");
        let html = self.create_element(name, attributes, false);
        self.stack.push(html);
        self.html = Some(html);
    }

    fn insert_head(&mut self, name: &'src [u8], attributes: Span<Attribute<'src>>) {
        let head = self.insert_element(name, attributes, false);
        self.stack.push(head);
        self.head = Some(head);
    }

    fn insert_body(&mut self, name: &'src [u8], attributes: Span<Attribute<'src>>) {
        let body = self.insert_element(name, attributes, false);
        self.stack.push(body);
    }

    /// Pop the head element and switch to "after head".
    fn close_head(&mut self) {
        let popped = self.pop();
        assert_eq!(Some(popped), self.head, "closed {popped:?} instead of <head>");
        self.switch_to(InsertionMode::AfterHead);
    }
}

fn is_named(name: &[u8], expected: &str) -> bool {
    name.eq_ignore_ascii_case(expected.as_bytes())
}

fn lossy(name: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    /// Run every token through the builder without finishing, so the stack
    /// is left as the last token saw it.
    fn feed<'a, 'src>(stream: &'a TokenStream<'src>) -> TreeBuilder<'a, 'src> {
        let mut builder = TreeBuilder::new(stream);
        builder.run_tokens();
        builder
    }

    #[test]
    fn test_generate_implied_end_tags_is_idempotent() {
        let stream = tokenize(b"<div><p><li>item").unwrap();
        let mut builder = feed(&stream);
        // html, body, div, p, li
        assert_eq!(builder.stack.len(), 5);

        builder.generate_implied_end_tags(None);
        assert_eq!(builder.stack.len(), 3);
        assert!(builder.current_node_is(b"div"));

        builder.generate_implied_end_tags(None);
        assert_eq!(builder.stack.len(), 3);
    }

    #[test]
    fn test_generate_implied_end_tags_respects_exclusion() {
        let stream = tokenize(b"<dl><dd><p>text").unwrap();
        let mut builder = feed(&stream);
        assert_eq!(builder.stack.len(), 5);

        builder.generate_implied_end_tags(Some(b"dd"));
        assert!(builder.current_node_is(b"dd"));
        assert_eq!(builder.stack.len(), 4);
    }

    #[test]
    fn test_scope_stops_at_table_cells() {
        let stream = tokenize(b"<table><td><p>cell").unwrap();
        let builder = feed(&stream);

        assert!(builder.has_element_in_scope("p"));
        assert!(builder.has_element_in_scope("td"));
        assert!(!builder.has_element_in_scope("table"));
        assert!(!builder.has_element_in_scope("body"));
    }

    #[test]
    fn test_scope_is_case_insensitive() {
        let stream = tokenize(b"<DIV><P>x").unwrap();
        let builder = feed(&stream);
        assert!(builder.has_element_in_scope("p"));
        assert!(builder.has_element_in_scope("div"));
    }

    #[test]
    fn test_modes_after_each_structural_tag() {
        let stream = tokenize(b"<html><head></head><body></body></html>").unwrap();
        let mut builder = TreeBuilder::new(&stream);
        let expected = [
            InsertionMode::BeforeHead,
            InsertionMode::InHead,
            InsertionMode::AfterHead,
            InsertionMode::InBody,
            InsertionMode::AfterBody,
            InsertionMode::AfterAfterBody,
        ];
        for (token, mode) in stream.tokens().iter().zip(expected) {
            while builder.process_token(*token) == Step::Reprocess {}
            builder.token_index += 1;
            assert_eq!(builder.mode(), mode);
        }
    }

    #[test]
    #[should_panic(expected = "found no html element")]
    fn test_scope_without_html_panics() {
        let stream = TokenStream::new();
        let builder = TreeBuilder::new(&stream);
        let _ = builder.has_element_in_scope("p");
    }

    #[test]
    #[should_panic(expected = "pop on an empty stack")]
    fn test_pop_on_empty_stack_panics() {
        let stream = TokenStream::new();
        let mut builder = TreeBuilder::new(&stream);
        let _ = builder.pop();
    }

    #[test]
    #[should_panic(expected = "with no open element")]
    fn test_insert_without_open_element_panics() {
        let stream = TokenStream::new();
        let mut builder = TreeBuilder::new(&stream);
        builder.insert_text(b"orphan");
    }

    #[test]
    #[should_panic(expected = "is not supported")]
    fn test_unreachable_mode_panics() {
        let stream = tokenize(b"x").unwrap();
        let mut builder = TreeBuilder::new(&stream);
        builder.mode = InsertionMode::Text;
        let _ = builder.process_token(stream.tokens()[0]);
    }
}
