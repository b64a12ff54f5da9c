use std::collections::HashSet;

use super::Cfg;
use crate::ast::Span;

/// Reachability sweep from the entry block. Returns the position of the
/// first statement of every unreachable, statement-bearing block.
pub fn unreachable_blocks(cfg: &Cfg) -> Vec<Span> {
    let mut reachable = HashSet::new();
    let mut stack = vec![cfg.entry];
    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }
        for succ in &cfg.block(id).succs {
            if !reachable.contains(succ) {
                stack.push(*succ);
            }
        }
    }

    cfg.blocks()
        .iter()
        .filter(|block| {
            !reachable.contains(&block.id)
                && block.id != cfg.entry
                && block.id != cfg.exit
                && !block.statements.is_empty()
        })
        .filter_map(|block| block.first_span().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::unreachable_blocks;
    use crate::ast::Span;
    use crate::cfg::Cfg;

    #[test]
    fn test_fully_connected_graph_is_clean() {
        let mut cfg = Cfg::new();
        let a = cfg.new_block();
        let exit = cfg.exit;
        cfg.add_successor(cfg.entry, a);
        cfg.add_successor(a, exit);
        cfg.block_mut(a).statements.push(Span::default());

        assert!(unreachable_blocks(&cfg).is_empty());
    }

    #[test]
    fn test_detached_statement_block_is_flagged() {
        let mut cfg = Cfg::new();
        let dead = cfg.new_block();
        let exit = cfg.exit;
        cfg.add_successor(cfg.entry, exit);
        cfg.block_mut(dead).statements.push(Span::default());

        assert_eq!(unreachable_blocks(&cfg).len(), 1);
    }

    #[test]
    fn test_empty_detached_blocks_are_ignored() {
        let mut cfg = Cfg::new();
        let _placeholder = cfg.new_block();
        let exit = cfg.exit;
        cfg.add_successor(cfg.entry, exit);

        assert!(unreachable_blocks(&cfg).is_empty());
    }
}
