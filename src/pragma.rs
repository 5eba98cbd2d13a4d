//! In-source directives that switch the transform off.
//!
//! A comment containing `@auto-observer-ignore-file` anywhere in a module
//! leaves the whole module untouched. A comment containing
//! `@auto-observer-ignore-block` suppresses the rest of the innermost statement
//! list around it (module body, block, function body, switch case, namespace
//! body), starting with the statement that holds the comment or the first one
//! after it. Leading, trailing and inner comments all count, and the tokens
//! are matched as substrings, so `@auto-observer-ignore-files` is a file
//! directive too.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::{
    common::{
        comments::{Comment, Comments},
        BytePos, Span, Spanned,
    },
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

static PRAGMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@auto-observer-ignore-(file|block)").expect("pragma pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PragmaScope {
    File,
    Block,
}

/// Finds the strongest directive in a comment body. File scope wins when a
/// comment names both.
pub fn parse_pragma(text: &str) -> Option<PragmaScope> {
    let mut found = None;
    for caps in PRAGMA_RE.captures_iter(text) {
        match caps.get(1).map(|m| m.as_str()) {
            Some("file") => return Some(PragmaScope::File),
            Some("block") => found = Some(PragmaScope::Block),
            _ => {}
        }
    }
    found
}

/// Byte range of a run of suppressed sibling statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRange {
    pub lo: BytePos,
    pub hi: BytePos,
}

impl NodeRange {
    pub fn contains(&self, span: Span) -> bool {
        self.lo <= span.lo && span.hi <= self.hi
    }
}

#[derive(Debug, Default)]
pub struct Suppression {
    pub file_suppressed: bool,
    pub block_ranges: HashSet<NodeRange>,
}

impl Suppression {
    /// Collects every comment attached to every node of `module` before any
    /// classification happens, then hands each block directive to the
    /// innermost statement list enclosing it.
    pub fn resolve<C: Comments>(module: &Module, comments: &C) -> Self {
        let mut scanner = PragmaScanner {
            comments,
            seen: HashSet::new(),
            file_suppressed: false,
            block_markers: BTreeSet::new(),
        };
        module.visit_with(&mut scanner);

        let mut claimer = BlockClaimer {
            pending: scanner.block_markers,
            ranges: HashSet::new(),
        };
        if !scanner.file_suppressed {
            module.visit_with(&mut claimer);
        }
        Suppression {
            file_suppressed: scanner.file_suppressed,
            block_ranges: claimer.ranges,
        }
    }

    /// Nodes built by this pass carry dummy spans and are never suppressed.
    pub fn covers(&self, span: Span) -> bool {
        !span.is_dummy() && self.block_ranges.iter().any(|range| range.contains(span))
    }
}

struct PragmaScanner<'a, C: Comments> {
    comments: &'a C,
    seen: HashSet<BytePos>,
    file_suppressed: bool,
    /// Start positions of comments carrying a block directive.
    block_markers: BTreeSet<BytePos>,
}

impl<C: Comments> PragmaScanner<'_, C> {
    fn record(&mut self, found: Vec<Comment>) {
        for cmt in found {
            match parse_pragma(&cmt.text) {
                Some(PragmaScope::File) => self.file_suppressed = true,
                Some(PragmaScope::Block) => {
                    self.block_markers.insert(cmt.span.lo);
                }
                None => {}
            }
        }
    }

    fn scan_position(&mut self, pos: BytePos) {
        if !self.seen.insert(pos) {
            return;
        }
        if let Some(found) = self.comments.get_leading(pos) {
            self.record(found);
        }
        if let Some(found) = self.comments.get_trailing(pos) {
            self.record(found);
        }
    }
}

impl<C: Comments> Visit for PragmaScanner<'_, C> {
    fn visit_span(&mut self, span: &Span) {
        if span.is_dummy() {
            return;
        }
        self.scan_position(span.lo);
        self.scan_position(span.hi);
        // comments right before a closing brace are keyed on the brace
        if span.hi.0 > span.lo.0 {
            self.scan_position(BytePos(span.hi.0 - 1));
        }
    }
}

/// Assigns block directives to statement lists, innermost first: nested lists
/// are visited before their parent gets to claim what is left inside its span.
struct BlockClaimer {
    pending: BTreeSet<BytePos>,
    ranges: HashSet<NodeRange>,
}

impl BlockClaimer {
    fn claim<T: Spanned>(&mut self, within: Option<Span>, list: &[T]) {
        let claimed: Vec<BytePos> = self
            .pending
            .iter()
            .copied()
            .filter(|pos| within.map_or(true, |span| span.lo <= *pos && *pos <= span.hi))
            .collect();
        let hi = list.iter().map(|item| item.span().hi).max();
        for pos in claimed {
            self.pending.remove(&pos);
            // the statement holding the marker, or the first one after it
            let start = list
                .iter()
                .map(|item| item.span())
                .find(|span| !span.is_dummy() && span.hi > pos);
            if let (Some(start), Some(hi)) = (start, hi) {
                self.ranges.insert(NodeRange { lo: start.lo, hi });
            }
        }
    }
}

impl Visit for BlockClaimer {
    fn visit_module(&mut self, module: &Module) {
        module.visit_children_with(self);
        self.claim(None, &module.body);
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        block.visit_children_with(self);
        self.claim(Some(block.span), &block.stmts);
    }

    fn visit_switch_case(&mut self, case: &SwitchCase) {
        case.visit_children_with(self);
        self.claim(Some(case.span), &case.cons);
    }

    fn visit_ts_module_block(&mut self, block: &TsModuleBlock) {
        block.visit_children_with(self);
        self.claim(Some(block.span), &block.body);
    }
}
