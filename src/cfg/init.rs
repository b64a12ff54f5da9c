use std::collections::BTreeSet;

use log::debug;

use super::Cfg;
use crate::ast::Span;

/// Hard cap on fixed-point rounds; real bodies converge in a handful.
const MAX_ROUNDS: usize = 100;

/// Definitely-initialized analysis. Forward must-analysis over the graph:
///
/// ```text
/// In[B]  = intersection of Out[P] over predecessors P (entry: empty)
/// Out[B] = defs[B] union In[B]
/// ```
///
/// Returns the uses that are not covered by a definition on every path,
/// as `(position of the block's first statement, variable)` pairs. The
/// caller seeds parameters into the entry block's defs beforehand.
pub fn check_initialization(cfg: &mut Cfg) -> Vec<(Span, String)> {
    // the top element of the must-lattice is "every variable"
    let mut universe: BTreeSet<String> = BTreeSet::new();
    for block in cfg.blocks() {
        universe.extend(block.defs.iter().cloned());
        universe.extend(block.uses.iter().cloned());
    }

    let ids: Vec<usize> = cfg.blocks().iter().map(|b| b.id).collect();

    // start every non-entry block at top so the intersection only shrinks
    for &id in &ids {
        let top = if id == cfg.entry {
            cfg.block(id).defs.clone()
        } else {
            universe.clone()
        };
        cfg.block_mut(id).init_out = top;
        cfg.block_mut(id).init_in = if id == cfg.entry {
            BTreeSet::new()
        } else {
            universe.clone()
        };
    }

    let mut changed = true;
    let mut rounds = 0;
    while changed && rounds < MAX_ROUNDS {
        changed = false;
        rounds += 1;

        for &id in &ids {
            let preds = cfg.block(id).preds.clone();
            let new_in = if id == cfg.entry {
                BTreeSet::new()
            } else if preds.is_empty() {
                universe.clone()
            } else {
                let mut iter = preds.iter();
                let mut acc = cfg.block(*iter.next().unwrap()).init_out.clone();
                for p in iter {
                    acc = acc
                        .intersection(&cfg.block(*p).init_out)
                        .cloned()
                        .collect();
                }
                acc
            };

            let mut new_out = cfg.block(id).defs.clone();
            new_out.extend(new_in.iter().cloned());

            let block = cfg.block_mut(id);
            if new_in != block.init_in || new_out != block.init_out {
                block.init_in = new_in;
                block.init_out = new_out;
                changed = true;
            }
        }
    }
    debug!("initialization fixed point after {rounds} round(s)");

    let mut findings = vec![];
    for &id in &ids {
        let block = cfg.block(id);
        for used in &block.uses {
            if !block.defs.contains(used) && !block.init_in.contains(used) {
                let position = block.first_span().cloned().unwrap_or_default();
                findings.push((position, used.clone()));
            }
        }
    }
    findings
}
