//! Demand-driven evaluation of a checked program.
//!
//! Namespace-level variables are forced on first reference and memoized in
//! the [`EvaluationContext`] under their pattern id; every expression
//! evaluated outside a function call is stored under its own id. A stack of
//! variables being initialized turns dependency cycles into
//! [`EvaluationError::CyclicInitializer`] instead of unbounded recursion.
//!
//! Function calls run in a [`Frame`] holding parameters and body-level
//! locals. Values computed inside a frame depend on the arguments and are
//! not stored.
//!
//! Evaluation runs on its own thread whose stack is sized for
//! [`EvalOptions::max_call_depth`], so a runaway recursion ends in
//! [`EvaluationError::RecursionLimit`] whatever the caller's stack is.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use logic_parser::ast::{
    BinaryExpression, BinaryOperator, Declaration, Expression, FunctionCallExpression,
    FunctionDeclaration, Literal, MemberExpression, NodeId, Program, Statement,
    VariableDeclaration,
};
use logic_typeck::bindings::{Binding, Bindings};
use logic_typeck::infer::UnificationContext;
use logic_typeck::scope::ScopeContext;
use logic_typeck::ty::Ty;
use logic_typeck::unify::Substitution;
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::error::EvaluationError;
use crate::value::{Function, Memory, Value};

/// Default bound on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

const STACK_BASE: usize = 1 << 20;
const STACK_PER_LEVEL: usize = 128 << 10;
const STACK_MAX: usize = 1 << 30;

#[derive(Clone, Debug, PartialEq)]
pub struct EvalOptions {
    /// Bound on nested user function calls and on chains of namespace
    /// initializers forcing one another.
    pub max_call_depth: usize,
}

impl EvalOptions {
    /// Stack size of the evaluation thread.
    fn stack_size(&self) -> usize {
        STACK_BASE
            .saturating_add(self.max_call_depth.saturating_mul(STACK_PER_LEVEL))
            .min(STACK_MAX)
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Evaluated values keyed by expression or pattern id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationContext {
    values: BTreeMap<NodeId, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.values.contains_key(id)
    }

    pub fn insert(&mut self, id: NodeId, value: Value) {
        self.values.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Value)> {
        self.values.iter()
    }
}

/// Evaluate every namespace-level variable, record field default and
/// top-level expression of `program`.
///
/// `context` may already hold values; ids present in it are not
/// re-evaluated.
pub fn evaluate(
    program: &Program,
    scope: &ScopeContext,
    unification: &UnificationContext,
    substitution: &Substitution,
    context: EvaluationContext,
    options: &EvalOptions,
) -> Result<EvaluationContext, EvaluationError> {
    let mut pending = Some(context);
    let finished = std::thread::scope(|s| {
        let pending = &mut pending;
        let worker = std::thread::Builder::new()
            .name("logic-eval".to_string())
            .stack_size(options.stack_size())
            .spawn_scoped(s, move || {
                pending.take().map(|context| {
                    run(program, scope, unification, substitution, context, options)
                })
            });
        match worker {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
            Err(_) => None,
        }
    });

    match finished {
        Some(result) => result,
        // The thread could not be spawned; evaluate on the caller's stack.
        None => run(
            program,
            scope,
            unification,
            substitution,
            pending.unwrap_or_default(),
            options,
        ),
    }
}

fn run(
    program: &Program,
    scope: &ScopeContext,
    unification: &UnificationContext,
    substitution: &Substitution,
    context: EvaluationContext,
    options: &EvalOptions,
) -> Result<EvaluationContext, EvaluationError> {
    let mut evaluator = Evaluator {
        bindings: Bindings::build(program),
        scope,
        unification,
        substitution,
        options,
        context,
        in_progress: Vec::new(),
        frames: Vec::new(),
        depth: 0,
    };
    evaluator.top_level(&program.block)?;
    Ok(evaluator.context)
}

/// How a block finished.
enum Flow {
    /// Fell off the end; carries the value of a trailing expression
    /// statement.
    Next(Option<Value>),
    Return(Value),
}

/// Locals of one function call, keyed by pattern id.
#[derive(Debug, Default)]
struct Frame {
    locals: FxHashMap<NodeId, Value>,
}

type Arguments<'a> = Vec<(Option<&'a str>, Value)>;

struct Evaluator<'a> {
    bindings: Bindings<'a>,
    scope: &'a ScopeContext,
    unification: &'a UnificationContext,
    substitution: &'a Substitution,
    options: &'a EvalOptions,
    context: EvaluationContext,
    /// Variables whose initializers are being evaluated, outermost first.
    in_progress: Vec<NodeId>,
    frames: Vec<Frame>,
    /// Active calls plus initializers being forced.
    depth: usize,
}

impl<'a> Evaluator<'a> {
    // ── Namespace level ────────────────────────────────────────────────

    fn top_level(&mut self, block: &'a [Statement]) -> Result<(), EvaluationError> {
        for statement in block {
            match statement {
                Statement::Declaration { content, .. } => self.top_level_declaration(content)?,
                Statement::Expression { expression, .. }
                | Statement::ReturnStatement {
                    expression: Some(expression),
                    ..
                } => {
                    self.expression(expression)?;
                }
                Statement::Branch {
                    condition, block, ..
                } => {
                    if self.condition(condition)? {
                        self.top_level(block)?;
                    }
                }
                Statement::ReturnStatement {
                    expression: None, ..
                }
                | Statement::Placeholder { .. } => {}
            }
        }
        Ok(())
    }

    fn top_level_declaration(&mut self, declaration: &'a Declaration) -> Result<(), EvaluationError> {
        match declaration {
            Declaration::Variable(d) => {
                if d.initializer.is_some() && !self.context.contains(&d.name.id) {
                    self.force_variable(d)?;
                }
            }
            Declaration::Record(d) => {
                for nested in &d.declarations {
                    match nested {
                        Declaration::Variable(field) => {
                            if let Some(default) = &field.initializer {
                                self.expression(default)?;
                            }
                        }
                        other => self.top_level_declaration(other)?,
                    }
                }
            }
            Declaration::Namespace(d) => {
                for nested in &d.declarations {
                    self.top_level_declaration(nested)?;
                }
            }
            Declaration::Function(_)
            | Declaration::Enumeration(_)
            | Declaration::ImportDeclaration(_)
            | Declaration::Placeholder(_) => {}
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EvaluationError> {
        if self.depth >= self.options.max_call_depth {
            return Err(EvaluationError::RecursionLimit {
                depth: self.options.max_call_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    // ── Bindings ───────────────────────────────────────────────────────

    fn name_of(&self, pattern: &NodeId) -> String {
        self.scope
            .pattern_names
            .get(pattern)
            .cloned()
            .unwrap_or_else(|| pattern.to_string())
    }

    /// The declared type of a pattern with solved variables applied.
    fn expected_type(&self, pattern: &NodeId) -> Option<Ty> {
        self.unification
            .pattern_types
            .get(pattern)
            .map(|scheme| self.substitution.apply(&scheme.ty))
    }

    fn declared_type(&self, pattern: &NodeId) -> Result<Ty, EvaluationError> {
        self.expected_type(pattern)
            .ok_or_else(|| EvaluationError::MissingType { id: pattern.clone() })
    }

    /// The value a reference to `pattern` denotes.
    fn force_pattern(&mut self, pattern: &NodeId) -> Result<Value, EvaluationError> {
        if let Some(value) = self.frames.last().and_then(|f| f.locals.get(pattern)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.context.get(pattern) {
            return Ok(value.clone());
        }
        let Some(binding) = self.bindings.get(pattern) else {
            return Err(EvaluationError::UninitializedVariable {
                name: self.name_of(pattern),
            });
        };
        match binding {
            Binding::Variable(d) => {
                // Locals live in frames; one that is not there has not run yet.
                if self.bindings.path_of(pattern).is_none() || d.initializer.is_none() {
                    return Err(EvaluationError::UninitializedVariable {
                        name: d.name.name.clone(),
                    });
                }
                self.force_variable(d)
            }
            Binding::Parameter(p) => Err(EvaluationError::UninitializedVariable {
                name: p.local_name.name.clone(),
            }),
            Binding::Function(_) => Ok(Value::new(
                self.declared_type(pattern)?,
                Memory::Function(Function::Declared {
                    pattern: pattern.clone(),
                }),
            )),
            Binding::Record(_) => Ok(Value::new(
                self.declared_type(pattern)?,
                Memory::Function(Function::RecordInit {
                    pattern: pattern.clone(),
                }),
            )),
            Binding::Case { case, .. } => {
                let ty = self.declared_type(pattern)?;
                let name = case.name.name.clone();
                if case.associated_value_types.is_empty() {
                    Ok(Value::new(
                        ty,
                        Memory::Enum {
                            case: name,
                            payload: Vec::new(),
                        },
                    ))
                } else {
                    Ok(Value::new(ty, Memory::Function(Function::EnumInit { case: name })))
                }
            }
            Binding::Enumeration(_) | Binding::Namespace(_) => Ok(Value::new(
                self.expected_type(pattern).unwrap_or_else(Ty::unit),
                Memory::Unit,
            )),
        }
    }

    /// Evaluate a variable's initializer and memoize it under the pattern.
    fn force_variable(&mut self, declaration: &'a VariableDeclaration) -> Result<Value, EvaluationError> {
        let pattern = &declaration.name.id;
        if let Some(start) = self.in_progress.iter().position(|p| p == pattern) {
            let mut path: Vec<String> = self.in_progress[start..]
                .iter()
                .map(|p| self.name_of(p))
                .collect();
            path.push(declaration.name.name.clone());
            return Err(EvaluationError::CyclicInitializer { path });
        }
        let Some(initializer) = &declaration.initializer else {
            return Err(EvaluationError::UninitializedVariable {
                name: declaration.name.name.clone(),
            });
        };

        self.enter()?;
        // Namespace-level initializers never see the caller's locals.
        self.in_progress.push(pattern.clone());
        let frames = std::mem::take(&mut self.frames);
        let result = self.expression(initializer);
        self.frames = frames;
        self.in_progress.pop();
        self.depth -= 1;

        let value = conform(result?, self.expected_type(pattern).as_ref());
        self.context.insert(pattern.clone(), value.clone());
        Ok(value)
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn expression(&mut self, expression: &'a Expression) -> Result<Value, EvaluationError> {
        let id = expression.id();
        if self.frames.is_empty() {
            if let Some(value) = self.context.get(id) {
                return Ok(value.clone());
            }
        }

        let scope = self.scope;
        let value = match expression {
            Expression::IdentifierExpression(e) => match scope.pattern_for(&e.id) {
                Some(pattern) => self.force_pattern(pattern)?,
                None => {
                    return Err(EvaluationError::UnresolvedIdentifier {
                        id: e.id.clone(),
                        name: e.identifier.string.clone(),
                    })
                }
            },
            Expression::MemberExpression(e) => self.member(e)?,
            Expression::FunctionCallExpression(e) => self.call(e)?,
            Expression::BinaryExpression(e) => self.binary(e)?,
            Expression::LiteralExpression(e) => self.literal(&e.literal)?,
            Expression::Placeholder(p) => {
                return Err(EvaluationError::UnresolvedIdentifier {
                    id: p.id.clone(),
                    name: "_".to_string(),
                })
            }
        };

        let value = self.typed(id, value)?;
        if self.frames.is_empty() {
            self.context.insert(id.clone(), value.clone());
        }
        Ok(value)
    }

    /// Attach the solved type of expression `id` to its value.
    fn typed(&self, id: &NodeId, mut value: Value) -> Result<Value, EvaluationError> {
        let ty = self
            .unification
            .node_type(id)
            .ok_or_else(|| EvaluationError::MissingType { id: id.clone() })?;
        let solved = self.substitution.apply(ty);
        // Generic bodies keep the runtime type; so do values that flow into
        // an optional without being wrapped yet.
        if solved.free_vars().is_empty() && (value.ty.is_optional() || !solved.is_optional()) {
            value.ty = solved;
        }
        Ok(value)
    }

    fn member(&mut self, member: &'a MemberExpression) -> Result<Value, EvaluationError> {
        let scope = self.scope;
        if let Some(pattern) = scope.pattern_for(&member.id) {
            return self.force_pattern(pattern);
        }
        let unresolved = || EvaluationError::UnresolvedMember {
            id: member.id.clone(),
            name: member.member_name.string.clone(),
        };
        let Some(field) = scope.field_accesses.get(&member.id) else {
            return Err(unresolved());
        };
        let base = self.expression(&member.expression)?;
        base.field(field).cloned().ok_or_else(unresolved)
    }

    fn literal(&mut self, literal: &'a Literal) -> Result<Value, EvaluationError> {
        let value = match literal {
            Literal::Boolean { value, .. } => Value::bool(*value),
            Literal::Number { value, .. } => Value::number(*value),
            Literal::String { value, .. } => Value::string(value.clone()),
            Literal::Color { value, .. } => Value::color(value.clone()),
            Literal::Array { value, .. } => {
                let items = value
                    .iter()
                    .map(|item| self.expression(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let element = items.first().map(|v| v.ty.clone()).unwrap_or_else(Ty::unit);
                Value::new(Ty::array(element), Memory::Array(items))
            }
        };
        Ok(value)
    }

    fn binary(&mut self, binary: &'a BinaryExpression) -> Result<Value, EvaluationError> {
        match binary.op {
            BinaryOperator::SetEqualTo { .. } => {
                let value = self.expression(&binary.right)?;
                self.assign(&binary.left, value)?;
                Ok(Value::unit())
            }
            BinaryOperator::IsEqualTo { .. } => {
                let (left, right) = self.operands(binary)?;
                Ok(Value::bool(left.same(&right)))
            }
            BinaryOperator::IsNotEqualTo { .. } => {
                let (left, right) = self.operands(binary)?;
                Ok(Value::bool(!left.same(&right)))
            }
            BinaryOperator::IsLessThan { .. } => self.ordered(binary, Ordering::is_lt),
            BinaryOperator::IsGreaterThan { .. } => self.ordered(binary, Ordering::is_gt),
            BinaryOperator::IsLessThanOrEqual { .. } => self.ordered(binary, Ordering::is_le),
            BinaryOperator::IsGreaterThanOrEqual { .. } => self.ordered(binary, Ordering::is_ge),
        }
    }

    fn operands(&mut self, binary: &'a BinaryExpression) -> Result<(Value, Value), EvaluationError> {
        let left = self.expression(&binary.left)?;
        let right = self.expression(&binary.right)?;
        Ok((left, right))
    }

    fn ordered(
        &mut self,
        binary: &'a BinaryExpression,
        test: fn(Ordering) -> bool,
    ) -> Result<Value, EvaluationError> {
        let (left, right) = self.operands(binary)?;
        let ordering = compare(binary.op.symbol(), &left, &right)?;
        Ok(Value::bool(test(ordering)))
    }

    /// `local = value` inside a function body.
    fn assign(&mut self, target: &'a Expression, value: Value) -> Result<(), EvaluationError> {
        let scope = self.scope;
        let pattern = match target {
            Expression::IdentifierExpression(e) => scope.pattern_for(&e.id),
            _ => None,
        };
        let local = pattern.filter(|p| {
            self.bindings.path_of(p).is_none()
                && self.bindings.get(p).is_some_and(|b| b.is_value())
        });
        let Some(pattern) = local else {
            return Err(EvaluationError::operands(
                "=",
                "the left side must be a local variable",
            ));
        };
        let value = conform(value, self.expected_type(pattern).as_ref());
        match self.frames.last_mut() {
            Some(frame) => {
                frame.locals.insert(pattern.clone(), value);
                Ok(())
            }
            None => Err(EvaluationError::operands(
                "=",
                "assignment outside of a function body",
            )),
        }
    }

    fn condition(&mut self, condition: &'a Expression) -> Result<bool, EvaluationError> {
        self.expression(condition)?
            .as_bool()
            .ok_or_else(|| EvaluationError::operands("if", "the condition must be a Boolean"))
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn call(&mut self, call: &'a FunctionCallExpression) -> Result<Value, EvaluationError> {
        let callee = self.expression(&call.expression)?;
        let mut args = Vec::new();
        for arg in call.arguments() {
            args.push((arg.label.as_deref(), self.expression(&arg.expression)?));
        }
        let Memory::Function(function) = callee.memory else {
            return Err(EvaluationError::NotCallable {
                id: call.id.clone(),
            });
        };
        match function {
            Function::EnumInit { case } => {
                let Ty::Fun(params, ret) = callee.ty else {
                    return Err(EvaluationError::NotCallable {
                        id: call.id.clone(),
                    });
                };
                if params.len() != args.len() {
                    return Err(EvaluationError::ArityMismatch {
                        function: case,
                        expected: params.len(),
                        found: args.len(),
                    });
                }
                let payload = args.into_iter().map(|(_, value)| value).collect();
                Ok(Value::new(*ret, Memory::Enum { case, payload }))
            }
            Function::RecordInit { pattern } => self.construct(&pattern, args),
            Function::Declared { pattern } => self.apply(&pattern, args),
        }
    }

    /// Build a record from labeled arguments and field defaults.
    fn construct(&mut self, pattern: &NodeId, args: Arguments<'a>) -> Result<Value, EvaluationError> {
        let Some(Binding::Record(record)) = self.bindings.get(pattern) else {
            return Err(EvaluationError::NotCallable { id: pattern.clone() });
        };
        let ty = match self.declared_type(pattern)? {
            Ty::Fun(_, ret) => *ret,
            other => other,
        };

        let found = args.len();
        let mut args: Vec<_> = args.into_iter().map(Some).collect();
        let mut fields = Vec::new();
        for field in record.fields() {
            let name = field.name.name.as_str();
            let supplied = take_argument(&mut args, Some(name));
            let value = match (supplied, &field.initializer) {
                (Some(value), _) => value,
                (None, Some(default)) => self.expression(default)?,
                (None, None) => {
                    return Err(EvaluationError::MissingArgument {
                        function: record.name.name.clone(),
                        label: name.to_string(),
                    })
                }
            };
            let value = conform(value, self.expected_type(&field.name.id).as_ref());
            fields.push((name.to_string(), value));
        }
        if args.iter().any(Option::is_some) {
            return Err(EvaluationError::ArityMismatch {
                function: record.name.name.clone(),
                expected: fields.len(),
                found,
            });
        }
        Ok(Value::new(ty, Memory::Record(fields)))
    }

    /// Call a declared function: a native builtin or a user body.
    fn apply(&mut self, pattern: &NodeId, args: Arguments<'a>) -> Result<Value, EvaluationError> {
        let Some(Binding::Function(function)) = self.bindings.get(pattern) else {
            return Err(EvaluationError::NotCallable { id: pattern.clone() });
        };
        self.enter()?;
        self.frames.push(Frame::default());
        let result = self.invoke(pattern, function, args);
        self.frames.pop();
        self.depth -= 1;

        let ret = match self.expected_type(pattern) {
            Some(Ty::Fun(_, ret)) => Some(*ret),
            _ => None,
        };
        Ok(conform(result?, ret.as_ref()))
    }

    fn invoke(
        &mut self,
        pattern: &NodeId,
        function: &'a FunctionDeclaration,
        args: Arguments<'a>,
    ) -> Result<Value, EvaluationError> {
        let bound = self.bind_arguments(function, args)?;
        if function.block.is_empty() {
            if let Some(path) = self.bindings.path_of(pattern) {
                if builtins::is_builtin_namespace(path) {
                    return builtins::apply(&path.join("."), bound);
                }
            }
        }
        match self.run_block(&function.block)? {
            Flow::Return(value) => Ok(value),
            Flow::Next(value) => Ok(value.unwrap_or_else(Value::unit)),
        }
    }

    /// Match arguments to parameters by label, positionally for unlabeled
    /// parameters, falling back to defaults. Bound values become locals of
    /// the current frame.
    fn bind_arguments(
        &mut self,
        function: &'a FunctionDeclaration,
        args: Arguments<'a>,
    ) -> Result<Vec<Value>, EvaluationError> {
        let found = args.len();
        let mut args: Vec<_> = args.into_iter().map(Some).collect();
        let mut bound = Vec::new();
        for param in function.parameters() {
            let label = param.label();
            let value = match (take_argument(&mut args, label), param.default_value.expression()) {
                (Some(value), _) => value,
                // Defaults may refer to earlier parameters.
                (None, Some(default)) => self.expression(default)?,
                (None, None) => {
                    return Err(EvaluationError::MissingArgument {
                        function: function.name.name.clone(),
                        label: label.unwrap_or(&param.local_name.name).to_string(),
                    })
                }
            };
            let value = conform(value, self.expected_type(&param.local_name.id).as_ref());
            if let Some(frame) = self.frames.last_mut() {
                frame
                    .locals
                    .insert(param.local_name.id.clone(), value.clone());
            }
            bound.push(value);
        }
        if args.iter().any(Option::is_some) {
            return Err(EvaluationError::ArityMismatch {
                function: function.name.name.clone(),
                expected: bound.len(),
                found,
            });
        }
        Ok(bound)
    }

    fn run_block(&mut self, block: &'a [Statement]) -> Result<Flow, EvaluationError> {
        let mut last = None;
        for statement in block {
            last = match statement {
                Statement::Declaration {
                    content: Declaration::Variable(d),
                    ..
                } => {
                    if let Some(initializer) = &d.initializer {
                        let value = self.expression(initializer)?;
                        let value = conform(value, self.expected_type(&d.name.id).as_ref());
                        if let Some(frame) = self.frames.last_mut() {
                            frame.locals.insert(d.name.id.clone(), value);
                        }
                    }
                    None
                }
                Statement::Declaration { .. } | Statement::Placeholder { .. } => None,
                Statement::Expression { expression, .. } => Some(self.expression(expression)?),
                Statement::ReturnStatement { expression, .. } => {
                    let value = match expression {
                        Some(e) => self.expression(e)?,
                        None => Value::unit(),
                    };
                    return Ok(Flow::Return(value));
                }
                Statement::Branch {
                    condition, block, ..
                } => {
                    if self.condition(condition)? {
                        match self.run_block(block)? {
                            Flow::Return(value) => return Ok(Flow::Return(value)),
                            Flow::Next(value) => value,
                        }
                    } else {
                        None
                    }
                }
            };
        }
        Ok(Flow::Next(last))
    }
}

/// Take the first unused argument carrying `label` (`None` = positional).
fn take_argument(args: &mut [Option<(Option<&str>, Value)>], label: Option<&str>) -> Option<Value> {
    args.iter_mut()
        .find(|slot| matches!(slot, Some((l, _)) if *l == label))
        .and_then(Option::take)
        .map(|(_, value)| value)
}

/// Values flowing into an `Optional` slot are wrapped in `Optional.value`.
fn conform(value: Value, expected: Option<&Ty>) -> Value {
    match expected {
        Some(expected)
            if expected.is_optional()
                && matches!(value.ty, Ty::Con(..))
                && !value.ty.is_optional() =>
        {
            let mut wrapped = Value::optional_value(value);
            if expected.free_vars().is_empty() {
                wrapped.ty = expected.clone();
            }
            wrapped
        }
        _ => value,
    }
}

fn compare(symbol: &str, left: &Value, right: &Value) -> Result<Ordering, EvaluationError> {
    match (&left.memory, &right.memory) {
        (Memory::Number(a), Memory::Number(b)) => a
            .partial_cmp(b)
            .ok_or_else(|| EvaluationError::operands(symbol, "numbers are not comparable")),
        (Memory::String(a), Memory::String(b)) => Ok(a.cmp(b)),
        _ => Err(EvaluationError::operands(
            symbol,
            "expected two Numbers or two Strings",
        )),
    }
}
