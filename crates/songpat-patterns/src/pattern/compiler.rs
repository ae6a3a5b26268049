//! Turn a pattern tree into a chain of closures.
//!
//! The tree is walked once. Each node becomes a boxed step that appends to
//! the output, so formatting a record never revisits the tree. Tag values are
//! kept in frame slots: the first reference within a lexical scope fetches
//! the value and later references in that scope reuse it. Branches of a
//! conditional start from a copy of the enclosing scope, so slots bound
//! inside a branch are invisible after it.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use songpat_query::{Predicate, Query};
use songpat_record::Record;
use songpat_record::tags::tagsplit;

use crate::dialect::Dialect;

use super::ast::{Node, Sequence};

/// Read side of a program: how tag values are fetched and emitted.
pub(crate) trait Accessor: 'static {
    /// A bound tag value.
    type Value: Send + Sync + 'static;
    /// What the program produces.
    type Output: Default;

    fn fetch(record: &dyn Record, tag: &str) -> Self::Value;
    fn is_truthy(value: &Self::Value) -> bool;
    fn push_literal(out: &mut Self::Output, text: &str);
    fn push_value(out: &mut Self::Output, dialect: Dialect, tag: &str, value: &Self::Value);
}

/// Display values joined into a single string.
pub(crate) struct Comma;

impl Accessor for Comma {
    type Value = String;
    type Output = String;

    fn fetch(record: &dyn Record, tag: &str) -> String {
        record.comma(tag)
    }

    fn is_truthy(value: &String) -> bool {
        !value.is_empty()
    }

    fn push_literal(out: &mut String, text: &str) {
        out.push_str(text);
    }

    fn push_value(out: &mut String, dialect: Dialect, tag: &str, value: &String) {
        out.push_str(&dialect.format_value(tag, value));
    }
}

/// A piece of list-program output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fragment {
    Single(String),
    Multi(Vec<String>),
}

/// Every value of a tag kept apart, for list expansion.
pub(crate) struct ListSeparate;

impl Accessor for ListSeparate {
    type Value = Vec<String>;
    type Output = Vec<Fragment>;

    fn fetch(record: &dyn Record, tag: &str) -> Vec<String> {
        record.list_separate(tag)
    }

    fn is_truthy(value: &Vec<String>) -> bool {
        value.iter().any(|item| !item.is_empty())
    }

    fn push_literal(out: &mut Vec<Fragment>, text: &str) {
        out.push(Fragment::Single(text.to_owned()));
    }

    fn push_value(out: &mut Vec<Fragment>, dialect: Dialect, tag: &str, value: &Vec<String>) {
        let fragment = match value.as_slice() {
            [] => Fragment::Single(String::new()),
            [only] => Fragment::Single(dialect.format_value(tag, only).into_owned()),
            many => Fragment::Multi(
                many.iter()
                    .map(|item| dialect.format_value(tag, item).into_owned())
                    .collect(),
            ),
        };
        out.push(fragment);
    }
}

/// Expand list-program output into every combination it describes.
pub(crate) fn expand(fragments: Vec<Fragment>) -> Vec<String> {
    let mut combinations = vec![String::new()];
    for fragment in fragments {
        match fragment {
            Fragment::Single(text) => {
                for combination in &mut combinations {
                    combination.push_str(&text);
                }
            }
            Fragment::Multi(values) => {
                combinations = values
                    .iter()
                    .flat_map(|value| {
                        combinations
                            .iter()
                            .map(move |combination| format!("{combination}{value}"))
                    })
                    .collect();
            }
        }
    }
    combinations
}

struct Run<'r, A: Accessor> {
    record: &'r dyn Record,
    frame: Vec<Option<A::Value>>,
    out: A::Output,
}

type Step<A> = Box<dyn Fn(&mut Run<'_, A>) + Send + Sync>;

/// A compiled pattern for one accessor.
pub(crate) struct Program<A: Accessor> {
    steps: Vec<Step<A>>,
    slots: usize,
}

impl<A: Accessor> Program<A> {
    pub(crate) fn run(&self, record: &dyn Record) -> A::Output {
        let mut run = Run {
            record,
            frame: std::iter::repeat_with(|| None).take(self.slots).collect(),
            out: A::Output::default(),
        };
        for step in &self.steps {
            step(&mut run);
        }
        run.out
    }
}

impl<A: Accessor> fmt::Debug for Program<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("steps", &self.steps.len())
            .field("slots", &self.slots)
            .finish()
    }
}

/// Conditional tags that read as queries, each parsed once per pattern.
#[derive(Default)]
pub(crate) struct Queries {
    parsed: HashMap<String, Option<Arc<Predicate>>>,
}

impl Queries {
    /// Parse every conditional tag of `ast` that looks like a query.
    pub(crate) fn collect(ast: &Sequence) -> Self {
        fn walk(sequence: &Sequence, parsed: &mut HashMap<String, Option<Arc<Predicate>>>) {
            for node in &sequence.children {
                if let Node::Conditional {
                    tag,
                    then,
                    otherwise,
                } = node
                {
                    if !parsed.contains_key(tag.as_str()) {
                        parsed.insert(tag.clone(), as_query(tag).map(Arc::new));
                    }
                    walk(then, parsed);
                    if let Some(branch) = otherwise {
                        walk(branch, parsed);
                    }
                }
            }
        }

        let mut parsed = HashMap::new();
        walk(ast, &mut parsed);
        Self { parsed }
    }

    fn get(&self, tag: &str) -> Option<Arc<Predicate>> {
        self.parsed.get(tag).cloned().flatten()
    }
}

/// Compile `ast` into a program rendering values with `dialect`.
///
/// Conditional tags found in `queries` are tested as queries.
pub(crate) fn compile<A: Accessor>(
    ast: &Sequence,
    dialect: Dialect,
    queries: &Queries,
) -> Program<A> {
    let mut compiler = Compiler {
        dialect,
        queries,
        slots: 0,
    };
    let steps = compiler.sequence::<A>(ast, &mut HashMap::new());
    Program {
        steps,
        slots: compiler.slots,
    }
}

enum Condition {
    Query(Arc<Predicate>),
    Tag { slot: usize, tag: String },
}

struct Compiler<'q> {
    dialect: Dialect,
    queries: &'q Queries,
    slots: usize,
}

impl Compiler<'_> {
    fn slot_for(&mut self, scope: &mut HashMap<String, usize>, tag: &str) -> usize {
        if let Some(&slot) = scope.get(tag) {
            return slot;
        }
        let slot = self.slots;
        self.slots += 1;
        scope.insert(tag.to_owned(), slot);
        slot
    }

    fn sequence<A: Accessor>(
        &mut self,
        sequence: &Sequence,
        scope: &mut HashMap<String, usize>,
    ) -> Vec<Step<A>> {
        let mut steps: Vec<Step<A>> = Vec::with_capacity(sequence.children.len());
        for node in &sequence.children {
            match node {
                Node::Literal(text) => {
                    let text = text.clone();
                    steps.push(Box::new(move |run: &mut Run<'_, A>| {
                        A::push_literal(&mut run.out, &text);
                    }));
                }
                Node::TagRef(tag) => steps.push(self.tag_ref::<A>(tag, scope)),
                Node::Conditional {
                    tag,
                    then,
                    otherwise,
                } => {
                    if let Some(step) = self.conditional::<A>(tag, then, otherwise.as_ref(), scope) {
                        steps.push(step);
                    }
                }
            }
        }
        steps
    }

    fn tag_ref<A: Accessor>(&mut self, tag: &str, scope: &mut HashMap<String, usize>) -> Step<A> {
        let slot = self.slot_for(scope, tag);
        let tag = tag.to_owned();
        let dialect = self.dialect;
        Box::new(move |run: &mut Run<'_, A>| {
            let Run { record, frame, out } = run;
            debug_assert!(slot < frame.len(), "slot {slot} outside frame");
            if let Some(cell) = frame.get_mut(slot) {
                let value = cell.get_or_insert_with(|| A::fetch(*record, &tag));
                A::push_value(out, dialect, &tag, value);
            }
        })
    }

    fn conditional<A: Accessor>(
        &mut self,
        tag: &str,
        then: &Sequence,
        otherwise: Option<&Sequence>,
        scope: &mut HashMap<String, usize>,
    ) -> Option<Step<A>> {
        let condition = match self.queries.get(tag) {
            Some(predicate) => Condition::Query(predicate),
            None => Condition::Tag {
                slot: self.slot_for(scope, tag),
                tag: tag.to_owned(),
            },
        };
        let then_steps = self.sequence::<A>(then, &mut scope.clone());
        let else_steps = otherwise
            .map(|branch| self.sequence::<A>(branch, &mut scope.clone()))
            .unwrap_or_default();
        if then_steps.is_empty() && else_steps.is_empty() {
            return None;
        }
        Some(Box::new(move |run: &mut Run<'_, A>| {
            let taken = match &condition {
                Condition::Query(predicate) => predicate.search(run.record),
                Condition::Tag { slot, tag } => {
                    let record = run.record;
                    run.frame.get_mut(*slot).is_some_and(|cell| {
                        A::is_truthy(cell.get_or_insert_with(|| A::fetch(record, tag)))
                    })
                }
            };
            let branch = if taken { &then_steps } else { &else_steps };
            for step in branch {
                step(run);
            }
        }))
    }
}

/// Read a conditional's tag text as a query when it looks like one.
fn as_query(tag: &str) -> Option<Predicate> {
    let looks_like_query = tag.contains('=')
        || tag.starts_with("#(")
        || tag.starts_with("&(")
        || tag.starts_with('!');
    if !looks_like_query {
        return None;
    }
    match Query::parse(tag) {
        Ok(query) => Some(query.into_predicate()),
        Err(err) => {
            log::debug!("conditional `{tag}` is not a query ({err}); testing it as a tag");
            None
        }
    }
}

/// Tags referenced anywhere in `ast`, tied tags split, in first-seen order.
/// Query conditionals contribute no tags.
pub(crate) fn referenced_tags(ast: &Sequence, queries: &Queries) -> Vec<String> {
    fn walk(sequence: &Sequence, queries: &Queries, tags: &mut Vec<String>) {
        for node in &sequence.children {
            match node {
                Node::Literal(_) => {}
                Node::TagRef(tag) => add(tag, tags),
                Node::Conditional {
                    tag,
                    then,
                    otherwise,
                } => {
                    if queries.get(tag).is_none() {
                        add(tag, tags);
                    }
                    walk(then, queries, tags);
                    if let Some(branch) = otherwise {
                        walk(branch, queries, tags);
                    }
                }
            }
        }
    }

    fn add(tag: &str, tags: &mut Vec<String>) {
        for part in tagsplit(tag) {
            if !tags.contains(&part) {
                tags.push(part);
            }
        }
    }

    let mut tags = Vec::new();
    walk(ast, queries, &mut tags);
    tags
}
