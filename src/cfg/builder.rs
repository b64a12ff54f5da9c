use std::collections::BTreeSet;

use super::{BlockId, Cfg};
use crate::ast::{
    AssignExpr, Expression, InterpPart, Statement, StaticMember, UnaryExpr, UnaryOperator,
};

/// Break/continue targets of the innermost enclosing loop.
struct LoopContext {
    continue_target: BlockId,
    break_target: BlockId,
}

/// Lowers a statement tree into a [`Cfg`]. Simple statements append to the
/// block under the cursor; control flow rewrites the cursor and inserts new
/// blocks. After a non-local transfer the cursor points at a freshly
/// allocated block with no incoming edges, so trailing statements become
/// diagnosable as unreachable.
struct CfgBuilder {
    cfg: Cfg,
    current: BlockId,
    loops: Vec<LoopContext>,
}

/// Build the control-flow graph for one function body.
pub fn build_cfg(body: &[Statement]) -> Cfg {
    let mut builder = CfgBuilder::new();
    builder.lower_statements(body);
    builder.finish()
}

impl CfgBuilder {
    fn new() -> CfgBuilder {
        let cfg = Cfg::new();
        let current = cfg.entry;
        CfgBuilder {
            cfg,
            current,
            loops: vec![],
        }
    }

    fn finish(mut self) -> Cfg {
        let exit = self.cfg.exit;
        self.cfg.add_successor(self.current, exit);
        self.cfg
    }

    fn lower_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.lower_statement(statement);
        }
    }

    fn lower_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.lower_statements(&block.statements),
            Statement::VarDecl(decl) => {
                self.push_span(statement);
                if let Some(init) = &decl.init {
                    self.collect_expression(init);
                    self.define(&decl.name);
                }
            }
            Statement::MultiVarDecl(multi) => {
                self.push_span(statement);
                for decl in &multi.decls {
                    if let Some(init) = &decl.init {
                        self.collect_expression(init);
                        self.define(&decl.name);
                    }
                }
            }
            Statement::Expression(stmt) => {
                self.push_span(statement);
                self.collect_expression(&stmt.expression);
            }
            Statement::If(if_stmt) => self.lower_if(if_stmt),
            Statement::While(while_stmt) => self.lower_while(while_stmt),
            Statement::DoWhile(do_while) => self.lower_do_while(do_while),
            Statement::For(for_stmt) => self.lower_for(for_stmt),
            Statement::Foreach(foreach) => self.lower_foreach(foreach),
            Statement::Switch(switch) => self.lower_switch(switch),
            Statement::Return(ret) => {
                self.push_span(statement);
                for value in &ret.values {
                    self.collect_expression(value);
                }
                self.cfg.block_mut(self.current).has_return = true;
                // everything after a return is syntactically dead
                self.current = self.cfg.new_block();
            }
            Statement::Break(_) => {
                self.push_span(statement);
                if let Some(ctx) = self.loops.last() {
                    let target = ctx.break_target;
                    self.cfg.add_successor(self.current, target);
                }
                self.current = self.cfg.new_block();
            }
            Statement::Continue(_) => {
                self.push_span(statement);
                if let Some(ctx) = self.loops.last() {
                    let target = ctx.continue_target;
                    self.cfg.add_successor(self.current, target);
                }
                self.current = self.cfg.new_block();
            }
            Statement::Try(try_stmt) => self.lower_try(try_stmt),
            Statement::Throw(throw) => {
                self.push_span(statement);
                self.collect_expression(&throw.value);
            }
            Statement::Echo(echo) => {
                self.push_span(statement);
                for value in &echo.values {
                    self.collect_expression(value);
                }
            }
        }
    }

    fn lower_if(&mut self, if_stmt: &crate::ast::If) {
        // the guard lives in the condition block
        self.cfg
            .block_mut(self.current)
            .statements
            .push(if_stmt.condition.position());
        self.collect_expression(&if_stmt.condition);

        let mut branch_exits = vec![];

        let then_block = self.cfg.new_block();
        self.cfg.add_successor(self.current, then_block);
        let mut cond_block = self.current;
        self.current = then_block;
        self.lower_statements(&if_stmt.then_body);
        branch_exits.push(self.current);

        for else_if in &if_stmt.else_ifs {
            // chain: previous condition falls through to the next one
            let next_cond = self.cfg.new_block();
            self.cfg.add_successor(cond_block, next_cond);
            self.cfg
                .block_mut(next_cond)
                .statements
                .push(else_if.condition.position());
            self.current = next_cond;
            self.collect_expression(&else_if.condition);

            let arm = self.cfg.new_block();
            self.cfg.add_successor(next_cond, arm);
            self.current = arm;
            self.lower_statements(&else_if.body);
            branch_exits.push(self.current);

            cond_block = next_cond;
        }

        if let Some(else_body) = &if_stmt.else_body {
            let else_block = self.cfg.new_block();
            self.cfg.add_successor(cond_block, else_block);
            self.current = else_block;
            self.lower_statements(else_body);
            branch_exits.push(self.current);
        } else {
            // no else: the condition path reaches the merge directly
            branch_exits.push(cond_block);
        }

        let merge = self.cfg.new_block();
        for exit in branch_exits {
            self.cfg.add_successor(exit, merge);
        }
        self.current = merge;
    }

    fn lower_while(&mut self, while_stmt: &crate::ast::While) {
        let head = self.cfg.new_block();
        self.cfg.add_successor(self.current, head);
        self.cfg
            .block_mut(head)
            .statements
            .push(while_stmt.condition.position());
        self.current = head;
        self.collect_expression(&while_stmt.condition);

        let body = self.cfg.new_block();
        self.cfg.add_successor(head, body);
        let exit = self.cfg.new_block();
        self.cfg.add_successor(head, exit);

        self.loops.push(LoopContext {
            continue_target: head,
            break_target: exit,
        });
        self.current = body;
        self.lower_statements(&while_stmt.body);
        self.cfg.add_successor(self.current, head);
        self.loops.pop();

        self.current = exit;
    }

    fn lower_do_while(&mut self, do_while: &crate::ast::DoWhile) {
        let body = self.cfg.new_block();
        self.cfg.add_successor(self.current, body);
        let cond = self.cfg.new_block();
        let exit = self.cfg.new_block();

        self.loops.push(LoopContext {
            continue_target: cond,
            break_target: exit,
        });
        self.current = body;
        self.lower_statements(&do_while.body);
        self.cfg.add_successor(self.current, cond);
        self.loops.pop();

        self.cfg
            .block_mut(cond)
            .statements
            .push(do_while.condition.position());
        self.current = cond;
        self.collect_expression(&do_while.condition);
        self.cfg.add_successor(cond, body);
        self.cfg.add_successor(cond, exit);

        self.current = exit;
    }

    fn lower_for(&mut self, for_stmt: &crate::ast::For) {
        if let Some(init) = &for_stmt.init {
            self.lower_statement(init);
        }

        let head = self.cfg.new_block();
        self.cfg.add_successor(self.current, head);
        self.current = head;
        if let Some(condition) = &for_stmt.condition {
            self.cfg
                .block_mut(head)
                .statements
                .push(condition.position());
            self.collect_expression(condition);
        }

        let body = self.cfg.new_block();
        self.cfg.add_successor(head, body);
        let exit = self.cfg.new_block();
        self.cfg.add_successor(head, exit);
        let post = self.cfg.new_block();

        self.loops.push(LoopContext {
            continue_target: post,
            break_target: exit,
        });
        self.current = body;
        self.lower_statements(&for_stmt.body);
        self.cfg.add_successor(self.current, post);
        self.loops.pop();

        self.current = post;
        if let Some(post_expr) = &for_stmt.post {
            self.cfg
                .block_mut(post)
                .statements
                .push(post_expr.position());
            self.collect_expression(post_expr);
        }
        self.cfg.add_successor(post, head);

        self.current = exit;
    }

    fn lower_foreach(&mut self, foreach: &crate::ast::Foreach) {
        let head = self.cfg.new_block();
        self.cfg.add_successor(self.current, head);
        self.cfg
            .block_mut(head)
            .statements
            .push(foreach.iterable.position());
        self.current = head;
        self.collect_expression(&foreach.iterable);

        let body = self.cfg.new_block();
        self.cfg.add_successor(head, body);
        let exit = self.cfg.new_block();
        self.cfg.add_successor(head, exit);

        // the iteration variables are assigned at the top of the body
        if let Some(key) = &foreach.key_var {
            self.cfg.block_mut(body).defs.insert(key.clone());
        }
        self.cfg
            .block_mut(body)
            .defs
            .insert(foreach.value_var.clone());

        self.loops.push(LoopContext {
            continue_target: head,
            break_target: exit,
        });
        self.current = body;
        self.lower_statements(&foreach.body);
        self.cfg.add_successor(self.current, head);
        self.loops.pop();

        self.current = exit;
    }

    fn lower_switch(&mut self, switch: &crate::ast::Switch) {
        // subject and case values are evaluated by the dispatch
        self.cfg
            .block_mut(self.current)
            .statements
            .push(switch.subject.position());
        self.collect_expression(&switch.subject);
        for case in &switch.cases {
            self.collect_expression(&case.value);
        }

        let switch_block = self.current;
        let merge = self.cfg.new_block();

        for case in &switch.cases {
            let case_block = self.cfg.new_block();
            self.cfg.add_successor(switch_block, case_block);
            self.current = case_block;
            self.lower_statements(&case.body);
            self.cfg.add_successor(self.current, merge);
        }

        if let Some(default) = &switch.default {
            let default_block = self.cfg.new_block();
            self.cfg.add_successor(switch_block, default_block);
            self.current = default_block;
            self.lower_statements(&default.body);
            self.cfg.add_successor(self.current, merge);
        } else {
            self.cfg.add_successor(switch_block, merge);
        }

        self.current = merge;
    }

    fn lower_try(&mut self, try_stmt: &crate::ast::Try) {
        let try_block = self.current;
        self.lower_statements(&try_stmt.body);
        let try_tail = self.current;

        let mut catch_tails = vec![];
        for catch in &try_stmt.catches {
            // conservative: the whole try region may transfer to any handler
            let catch_block = self.cfg.new_block();
            self.cfg.add_successor(try_block, catch_block);
            self.cfg
                .block_mut(catch_block)
                .defs
                .insert(catch.variable.clone());
            self.current = catch_block;
            self.lower_statements(&catch.body);
            catch_tails.push(self.current);
        }

        let merge = self.cfg.new_block();
        if let Some(finally) = &try_stmt.finally {
            let finally_block = self.cfg.new_block();
            self.cfg.add_successor(try_tail, finally_block);
            for tail in catch_tails {
                self.cfg.add_successor(tail, finally_block);
            }
            self.current = finally_block;
            self.lower_statements(finally);
            self.cfg.add_successor(self.current, merge);
        } else {
            self.cfg.add_successor(try_tail, merge);
            for tail in catch_tails {
                self.cfg.add_successor(tail, merge);
            }
        }

        self.current = merge;
    }

    fn push_span(&mut self, statement: &Statement) {
        self.cfg
            .block_mut(self.current)
            .statements
            .push(statement.position());
    }

    fn define(&mut self, name: &str) {
        self.cfg
            .block_mut(self.current)
            .defs
            .insert(name.to_string());
    }

    /// Record the variables `expr` reads and writes into the current block.
    fn collect_expression(&mut self, expr: &Expression) {
        let mut defs = BTreeSet::new();
        let mut uses = BTreeSet::new();
        collect(expr, &mut defs, &mut uses);
        let block = self.cfg.block_mut(self.current);
        block.defs.extend(defs);
        block.uses.extend(uses);
    }
}

fn collect(expr: &Expression, defs: &mut BTreeSet<String>, uses: &mut BTreeSet<String>) {
    match expr {
        Expression::Int(_)
        | Expression::Float(_)
        | Expression::String(_)
        | Expression::Bool(_)
        | Expression::Null(_)
        | Expression::This(_) => {}
        Expression::InterpString(interp) => {
            for part in &interp.parts {
                if let InterpPart::Expression(inner) = part {
                    collect(inner, defs, uses);
                }
            }
        }
        Expression::Variable(variable) => {
            uses.insert(variable.name.clone());
        }
        Expression::Binary(binary) => {
            collect(&binary.left, defs, uses);
            collect(&binary.right, defs, uses);
        }
        Expression::Unary(unary_expr) => {
            let UnaryExpr {
                operator, operand, ..
            } = unary_expr.as_ref();
            collect(operand, defs, uses);
            // ++/-- writes its operand back
            if matches!(operator, UnaryOperator::Increment | UnaryOperator::Decrement) {
                if let Expression::Variable(variable) = operand {
                    defs.insert(variable.name.clone());
                }
            }
        }
        Expression::Assign(assign) => {
            let AssignExpr { target, value, .. } = assign.as_ref();
            collect(value, defs, uses);
            match target {
                Expression::Variable(variable) => {
                    defs.insert(variable.name.clone());
                }
                other => collect(other, defs, uses),
            }
        }
        Expression::Call(call) => {
            // a bare callee names a function, not a local
            if !matches!(call.callee, Expression::Variable(_)) {
                collect(&call.callee, defs, uses);
            }
            for arg in &call.args {
                collect(arg, defs, uses);
            }
        }
        Expression::PropertyAccess(access) => collect(&access.object, defs, uses),
        Expression::SafePropertyAccess(access) => collect(&access.object, defs, uses),
        Expression::MethodCall(call) => {
            collect(&call.object, defs, uses);
            for arg in &call.args {
                collect(arg, defs, uses);
            }
        }
        Expression::SafeMethodCall(call) => {
            collect(&call.object, defs, uses);
            for arg in &call.args {
                collect(arg, defs, uses);
            }
        }
        Expression::Index(index) => {
            collect(&index.object, defs, uses);
            collect(&index.index, defs, uses);
        }
        Expression::Array(array) => {
            for element in &array.elements {
                collect(element, defs, uses);
            }
        }
        Expression::Map(map) => {
            for (key, value) in &map.entries {
                collect(key, defs, uses);
                collect(value, defs, uses);
            }
        }
        Expression::New(new) => {
            for arg in &new.args {
                collect(arg, defs, uses);
            }
        }
        Expression::Is(is) => collect(&is.expr, defs, uses),
        Expression::Cast(cast) => collect(&cast.expr, defs, uses),
        Expression::Ternary(ternary) => {
            collect(&ternary.condition, defs, uses);
            collect(&ternary.then_branch, defs, uses);
            collect(&ternary.else_branch, defs, uses);
        }
        Expression::StaticAccess(access) => {
            if let StaticMember::Method { args, .. } = &access.member {
                for arg in args {
                    collect(arg, defs, uses);
                }
            }
        }
        Expression::NullCoalesce(coalesce) => {
            collect(&coalesce.left, defs, uses);
            collect(&coalesce.right, defs, uses);
        }
    }
}
