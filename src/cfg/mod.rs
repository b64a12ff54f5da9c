//! Control-flow graph over one function body. Blocks live in an arena
//! owned by the [`Cfg`]; edges are block ids, so the mutual references of
//! the graph never become ownership cycles.

mod builder;
mod init;
mod reachability;
mod returns;

pub use self::builder::build_cfg;
pub use self::init::check_initialization;
pub use self::reachability::unreachable_blocks;
pub use self::returns::all_paths_return;

use std::collections::BTreeSet;

use crate::ast::Span;

pub type BlockId = usize;

/// Linear run of statements with its flow edges and the per-block sets the
/// data-flow passes work on.
#[derive(Debug, Clone, Default)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Source positions of the statements placed in this block
    pub statements: Vec<Span>,
    pub preds: Vec<BlockId>,
    pub succs: Vec<BlockId>,
    /// Variables assigned somewhere in this block
    pub defs: BTreeSet<String>,
    /// Variables read somewhere in this block
    pub uses: BTreeSet<String>,
    /// Definitely-initialized variables on entry (fixed-point result)
    pub init_in: BTreeSet<String>,
    /// Definitely-initialized variables on exit (fixed-point result)
    pub init_out: BTreeSet<String>,
    pub has_return: bool,
}

impl BasicBlock {
    pub fn first_span(&self) -> Option<&Span> {
        self.statements.first()
    }
}

#[derive(Debug, Clone)]
pub struct Cfg {
    blocks: Vec<BasicBlock>,
    pub entry: BlockId,
    pub exit: BlockId,
}

impl Cfg {
    pub fn new() -> Cfg {
        let mut cfg = Cfg {
            blocks: vec![],
            entry: 0,
            exit: 0,
        };
        cfg.entry = cfg.new_block();
        cfg.exit = cfg.new_block();
        cfg
    }

    pub fn new_block(&mut self) -> BlockId {
        let id = self.blocks.len();
        self.blocks.push(BasicBlock {
            id,
            ..BasicBlock::default()
        });
        id
    }

    /// Create the edge `from -> to`, mirroring it into the predecessor
    /// list. Duplicate edges are not recorded.
    pub fn add_successor(&mut self, from: BlockId, to: BlockId) {
        if self.blocks[from].succs.contains(&to) {
            return;
        }
        self.blocks[from].succs.push(to);
        self.blocks[to].preds.push(from);
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id]
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Cfg::new()
    }
}
