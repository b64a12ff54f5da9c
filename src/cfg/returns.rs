use std::collections::HashSet;

use super::{BlockId, Cfg};

/// True iff every path from entry to exit passes through a block that
/// returns. Back edges are conservatively treated as returning: an
/// infinite loop that never falls through is acceptable on its own.
pub fn all_paths_return(cfg: &Cfg) -> bool {
    let mut visited = HashSet::new();
    returns_from(cfg, cfg.entry, &mut visited)
}

fn returns_from(cfg: &Cfg, block: BlockId, visited: &mut HashSet<BlockId>) -> bool {
    if !visited.insert(block) {
        return true;
    }

    let b = cfg.block(block);
    if b.has_return {
        return true;
    }
    if block == cfg.exit {
        return false;
    }
    if b.succs.is_empty() {
        // detached placeholder: falling off the body without returning
        return false;
    }

    b.succs
        .iter()
        .all(|succ| returns_from(cfg, *succ, visited))
}
