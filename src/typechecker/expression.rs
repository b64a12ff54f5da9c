use super::{Diagnostic, DiagnosticCode, Type, TypeChecker};
use crate::ast::{
    AssignExpr, BinaryExpr, CallExpr, Expression, IndexExpr, InterpPart, MethodCall, NewExpr,
    PropertyAccess, SafeMethodCall, SafePropertyAccess, StaticAccess, StaticMember, TernaryExpr,
    UnaryExpr, UnaryOperator, Variable,
};

impl TypeChecker<'_> {
    /// Synthesize the semantic type of `expr`, accumulating diagnostics
    /// along the way. Returns [`Type::Error`] after reporting an undefined
    /// name so downstream checks stay quiet.
    pub(crate) fn check_expression(&mut self, expr: &Expression) -> Type {
        match expr {
            Expression::Int(_) => Type::Int,
            Expression::Float(_) => Type::Float,
            Expression::String(_) => Type::String,
            Expression::InterpString(interp) => {
                for part in &interp.parts {
                    if let InterpPart::Expression(inner) = part {
                        self.check_expression(inner);
                    }
                }
                Type::String
            }
            Expression::Bool(_) => Type::Bool,
            Expression::Null(_) => Type::Null,
            Expression::Variable(variable) => self.check_variable(variable),
            Expression::This(_) => match &self.current_class {
                Some(class) => Type::Object(class.clone()),
                None => Type::Any,
            },
            Expression::Binary(binary) => self.check_binary(binary),
            Expression::Unary(unary) => self.check_unary(unary),
            Expression::Assign(assign) => self.check_assign(assign),
            Expression::Call(call) => self.check_call(call),
            Expression::PropertyAccess(access) => self.check_property_access(access),
            Expression::MethodCall(call) => self.check_method_call(call),
            Expression::SafePropertyAccess(access) => self.check_safe_property_access(access),
            Expression::SafeMethodCall(call) => self.check_safe_method_call(call),
            Expression::Index(index) => self.check_index(index),
            Expression::Array(array) => {
                let element_types: Vec<Type> = array
                    .elements
                    .iter()
                    .map(|e| self.check_expression(e))
                    .collect();
                match element_types.into_iter().next() {
                    Some(first) => Type::Array(Box::new(first)),
                    None => Type::Simple("array".into()),
                }
            }
            Expression::Map(map) => {
                let mut first_pair = None;
                for (key, value) in &map.entries {
                    let key_ty = self.check_expression(key);
                    let value_ty = self.check_expression(value);
                    if first_pair.is_none() {
                        first_pair = Some((key_ty, value_ty));
                    }
                }
                match first_pair {
                    Some((key, value)) => Type::Map(Box::new(key), Box::new(value)),
                    None => Type::Simple("map".into()),
                }
            }
            Expression::New(new_expr) => {
                let NewExpr { class, args, .. } = new_expr.as_ref();
                for arg in args {
                    self.check_expression(arg);
                }
                Type::Object(class.clone())
            }
            Expression::Is(is) => {
                self.check_expression(&is.expr);
                Type::Bool
            }
            Expression::Cast(cast) => {
                self.check_expression(&cast.expr);
                Type::from(&cast.ty)
            }
            Expression::Ternary(ternary) => self.check_ternary(ternary),
            Expression::StaticAccess(access) => self.check_static_access(access),
            Expression::NullCoalesce(coalesce) => {
                let left = self.check_expression(&coalesce.left);
                let right = self.check_expression(&coalesce.right);
                let stripped = left.strip_null();
                if stripped == right.strip_null() || stripped == right {
                    stripped
                } else {
                    Type::union(vec![stripped, right])
                }
            }
        }
    }

    fn check_variable(&mut self, variable: &Variable) -> Type {
        let Some(info) = self.scope.lookup(&variable.name) else {
            self.errors.push(Diagnostic::undefined_variable(
                &variable.name,
                variable.position.clone(),
            ));
            return Type::Error;
        };
        let info = info.clone();

        if !info.initialized {
            self.errors.push(Diagnostic::uninitialized_variable(
                &variable.name,
                variable.position.clone(),
            ));
        }

        if let Some(narrowed) = self.scope.narrowing(&variable.name) {
            return narrowed.clone();
        }
        info.declared
    }

    fn check_binary(&mut self, binary: &BinaryExpr) -> Type {
        let left = self.check_expression(&binary.left);
        let right = self.check_expression(&binary.right);
        let operator = binary.operator;

        if operator.is_arithmetic() {
            // dynamic operands pass through; the runtime coerces them
            let dynamic = |ty: &Type| matches!(ty, Type::Any | Type::Mixed | Type::Error);
            if (!left.is_numeric() && !dynamic(&left)) || (!right.is_numeric() && !dynamic(&right))
            {
                self.errors.push(Diagnostic::new(
                    binary.position.clone(),
                    DiagnosticCode::OperandsMustBeNumbers,
                    format!("operands of arithmetic must be numbers, got '{left}' and '{right}'"),
                ));
                return Type::Error;
            }
            if left == Type::Float || right == Type::Float {
                return Type::Float;
            }
            if dynamic(&left) || dynamic(&right) {
                return Type::Any;
            }
            return Type::Int;
        }

        if operator.is_comparison() || operator.is_logical() {
            return Type::Bool;
        }

        // bitwise and shifts
        Type::Int
    }

    fn check_unary(&mut self, unary: &UnaryExpr) -> Type {
        let operand = self.check_expression(&unary.operand);
        match unary.operator {
            UnaryOperator::Negate | UnaryOperator::Plus => {
                if !operand.is_numeric()
                    && !matches!(operand, Type::Any | Type::Mixed | Type::Error)
                {
                    self.errors.push(Diagnostic::new(
                        unary.position.clone(),
                        DiagnosticCode::OperandMustBeNumber,
                        format!("operand of sign must be a number, got '{operand}'"),
                    ));
                    return Type::Error;
                }
                operand
            }
            UnaryOperator::Not => Type::Bool,
            UnaryOperator::BitNot => Type::Int,
            UnaryOperator::Increment | UnaryOperator::Decrement => operand,
        }
    }

    fn check_assign(&mut self, assign: &AssignExpr) -> Type {
        let AssignExpr { target, value, .. } = assign;
        let value_ty = self.check_expression(value);

        let target_ty = match target {
            Expression::Variable(variable) => {
                let Some(info) = self.scope.lookup(&variable.name) else {
                    self.errors.push(Diagnostic::undefined_variable(
                        &variable.name,
                        variable.position.clone(),
                    ));
                    return Type::Error;
                };
                let declared = info.declared.clone();
                self.scope.mark_initialized(&variable.name);
                declared
            }
            other => self.check_expression(other),
        };

        if !self.symbols().is_compatible(&value_ty, &target_ty) {
            self.errors.push(Diagnostic::cannot_assign(
                &target_ty,
                &value_ty,
                assign.position.clone(),
            ));
        }

        target_ty
    }

    fn check_call(&mut self, call: &CallExpr) -> Type {
        for arg in &call.args {
            self.check_expression(arg);
        }

        // a bare identifier names a free function, not a local
        if let Expression::Variable(variable) = &call.callee {
            return self
                .symbols()
                .get_function(&variable.name)
                .map(|sig| sig.return_type.clone())
                .unwrap_or(Type::Any);
        }

        self.check_expression(&call.callee);
        Type::Any
    }

    /// Member lookups only resolve through class-typed receivers; anything
    /// else (strings, arrays, `any`) falls back to `any`.
    fn member_class(&self, receiver: &Type) -> Option<String> {
        receiver.strip_null().base_object().map(str::to_string)
    }

    fn check_property_access(&mut self, access: &PropertyAccess) -> Type {
        let object_ty = self.check_expression(&access.object);
        if object_ty.is_nullable() {
            self.warnings.push(Diagnostic::nullable_access(
                &object_ty,
                access.position.clone(),
            ));
        }

        let Some(class) = self.member_class(&object_ty) else {
            return Type::Any;
        };
        self.symbols()
            .get_property(&class, &access.property)
            .map(|prop| prop.ty.clone())
            .unwrap_or(Type::Any)
    }

    fn check_method_call(&mut self, call: &MethodCall) -> Type {
        let object_ty = self.check_expression(&call.object);
        for arg in &call.args {
            self.check_expression(arg);
        }

        if object_ty.is_nullable() {
            self.warnings.push(Diagnostic::nullable_access(
                &object_ty,
                call.position.clone(),
            ));
        }

        let Some(class) = self.member_class(&object_ty) else {
            return Type::Any;
        };
        self.symbols()
            .get_method(&class, &call.method, call.args.len())
            .map(|sig| sig.return_type.clone())
            .unwrap_or(Type::Any)
    }

    fn check_safe_property_access(&mut self, access: &SafePropertyAccess) -> Type {
        // `?.` exists to tolerate null receivers, so no nullability warning
        let object_ty = self.check_expression(&access.object);
        let result = match self.member_class(&object_ty) {
            Some(class) => self
                .symbols()
                .get_property(&class, &access.property)
                .map(|prop| prop.ty.clone())
                .unwrap_or(Type::Any),
            None => Type::Any,
        };
        result.nullable()
    }

    fn check_safe_method_call(&mut self, call: &SafeMethodCall) -> Type {
        let object_ty = self.check_expression(&call.object);
        for arg in &call.args {
            self.check_expression(arg);
        }
        let result = match self.member_class(&object_ty) {
            Some(class) => self
                .symbols()
                .get_method(&class, &call.method, call.args.len())
                .map(|sig| sig.return_type.clone())
                .unwrap_or(Type::Any),
            None => Type::Any,
        };
        result.nullable()
    }

    fn check_index(&mut self, index: &IndexExpr) -> Type {
        let object_ty = self.check_expression(&index.object);
        self.check_expression(&index.index);
        match object_ty {
            Type::Array(element) => *element,
            Type::Map(_, value) => *value,
            _ => Type::Any,
        }
    }

    fn check_ternary(&mut self, ternary: &TernaryExpr) -> Type {
        self.check_expression(&ternary.condition);
        let then_ty = self.check_expression(&ternary.then_branch);
        let else_ty = self.check_expression(&ternary.else_branch);
        if then_ty == else_ty {
            then_ty
        } else {
            Type::union(vec![then_ty, else_ty])
        }
    }

    fn check_static_access(&mut self, access: &StaticAccess) -> Type {
        let class = match access.target.as_str() {
            "self" => match &self.current_class {
                Some(current) => current.clone(),
                None => return Type::Any,
            },
            // parent:: stays unresolved
            "parent" => {
                if let StaticMember::Method { args, .. } = &access.member {
                    for arg in args {
                        self.check_expression(arg);
                    }
                }
                return Type::Any;
            }
            name => name.to_string(),
        };

        match &access.member {
            StaticMember::Method { name, args } => {
                for arg in args {
                    self.check_expression(arg);
                }
                self.symbols()
                    .get_method(&class, name, args.len())
                    .map(|sig| sig.return_type.clone())
                    .unwrap_or(Type::Any)
            }
            StaticMember::Constant { name } => self
                .symbols()
                .get_constant(&class, name)
                .cloned()
                .unwrap_or(Type::Any),
            StaticMember::Property { name } => self
                .symbols()
                .get_property(&class, name)
                .map(|prop| prop.ty.clone())
                .unwrap_or(Type::Any),
        }
    }
}
