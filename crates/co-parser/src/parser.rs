//! Recursive-descent parser with Pratt expression parsing.
//!
//! The parser never aborts: every failure pushes an issue and synchronises
//! on a statement or definition boundary, so one malformed definition does
//! not hide the rest of the file. Absent operands become
//! [`Expr::Missing`] nodes for the analyser to report.

use bumpalo::Bump;

use co_core::{Issue, IssueKind, Span};

use crate::ast::{
    CallExpr, CodeBlock, ConstructorDef, Expr, FunctionDef, GlobalDef, Ident, IfElseStmt,
    InfixExpr, InfixOp, LiteralExpr, Member, MemberExpr, Param, ParenExpr, PrefixExpr, PrefixOp,
    Program, ReturnStmt, Stmt, TypeDef, TypeExpr, VariableDecl, VariablesDef, WhileStmt,
};
use crate::lexer::{self, Token, TokenKind};

/// Parse a source string into a raw tree allocated in `arena`.
///
/// Returns the program together with all lexer and parser issues, in source
/// order.
pub fn parse<'ast>(arena: &'ast Bump, source: &'ast str) -> (Program<'ast>, Vec<Issue>) {
    let (tokens, mut issues) = lexer::tokenize(source);
    let mut parser = Parser::new(arena, tokens);
    let program = parser.parse_program();
    issues.append(&mut parser.issues);
    (program, issues)
}

/// The parser state over a token stream.
pub struct Parser<'ast> {
    arena: &'ast Bump,
    tokens: Vec<Token<'ast>>,
    pos: usize,
    issues: Vec<Issue>,
}

impl<'ast> Parser<'ast> {
    pub fn new(arena: &'ast Bump, mut tokens: Vec<Token<'ast>>) -> Self {
        // The lexer always terminates the stream; guard direct callers.
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, "", Span::default()));
        }
        Self {
            arena,
            tokens,
            pos: 0,
            issues: Vec::new(),
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn peek(&self) -> Token<'ast> {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn issue(&mut self, kind: IssueKind, span: Span) {
        self.issues.push(Issue::new(kind, span));
    }

    /// Expect an identifier. A keyword in identifier position is reported
    /// (E0010) but still consumed and used as the name, which keeps the rest
    /// of the definition analysable.
    fn expect_ident(&mut self) -> Option<Ident<'ast>> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            self.advance();
            return Some(Ident::new(token.lexeme, token.span));
        }
        if token.kind.is_keyword() {
            self.issue(
                IssueKind::KeywordAsIdentifier {
                    keyword: token.lexeme.to_string(),
                },
                token.span,
            );
            self.advance();
            return Some(Ident::new(token.lexeme, token.span));
        }
        None
    }

    fn expect_semicolon(&mut self, fallback: IssueKind) {
        if self.eat(TokenKind::Semicolon).is_none() {
            let span = self.peek().span;
            self.issue(fallback, span.before());
        }
    }

    // =========================================================================
    // Program and definitions
    // =========================================================================

    pub fn parse_program(&mut self) -> Program<'ast> {
        let start = self.peek().span;
        let mut definitions = Vec::new();

        while !self.check(TokenKind::Eof) {
            match self.parse_global_def() {
                Some(def) => definitions.push(def),
                None => {
                    let span = self.peek().span;
                    self.issue(IssueKind::ExpectedDefinition, span);
                    self.sync_definition();
                }
            }
        }

        let span = start.merge(self.peek().span);
        Program {
            definitions: self.arena.alloc_slice_copy(&definitions),
            span,
        }
    }

    fn parse_global_def(&mut self) -> Option<GlobalDef<'ast>> {
        if self.check(TokenKind::Class)
            || (self.check(TokenKind::Native) && self.nth_kind(1) == TokenKind::Class)
        {
            return self.parse_type_def().map(GlobalDef::Type);
        }

        let start = self.peek().span;
        let is_native = self.eat(TokenKind::Native).is_some();
        let ty = self.parse_type_expr()?;
        let name = self.expect_ident()?;

        if self.check(TokenKind::LParen)
            || (self.check(TokenKind::Amp) && self.nth_kind(1) == TokenKind::LParen)
        {
            let def = self.parse_function_tail(is_native, ty, name, start)?;
            return Some(GlobalDef::Function(self.arena.alloc(def)));
        }

        let def = self.parse_variables_tail(ty, name, start);
        Some(GlobalDef::Variables(self.arena.alloc(def)))
    }

    fn parse_type_def(&mut self) -> Option<&'ast TypeDef<'ast>> {
        let start = self.peek().span;
        let is_native = self.eat(TokenKind::Native).is_some();
        self.eat(TokenKind::Class)?;
        let name = self.expect_ident()?;

        if self.eat(TokenKind::LBrace).is_none() {
            let span = self.peek().span;
            self.issue(IssueKind::ExpectedDefinition, span);
            self.sync_definition();
            return None;
        }

        let mut members = Vec::new();
        loop {
            match self.kind() {
                TokenKind::RBrace => {
                    break;
                }
                TokenKind::Eof => {
                    let span = self.peek().span;
                    self.issue(IssueKind::MissingClosingBrace, span);
                    break;
                }
                _ => match self.parse_member(name.name) {
                    Some(member) => members.push(member),
                    None => {
                        let span = self.peek().span;
                        self.issue(IssueKind::ExpectedDefinition, span);
                        self.sync_member();
                    }
                },
            }
        }
        let end = self.eat(TokenKind::RBrace).map_or(self.peek().span, |t| t.span);

        let def = TypeDef {
            is_native,
            name,
            members: self.arena.alloc_slice_copy(&members),
            span: start.merge(end),
        };
        Some(self.arena.alloc(def))
    }

    fn parse_member(&mut self, type_name: &str) -> Option<Member<'ast>> {
        let start = self.peek().span;
        let is_native = self.eat(TokenKind::Native).is_some();

        // `Name(...)` where Name is the enclosing type is a constructor.
        if self.check(TokenKind::Identifier)
            && self.peek().lexeme == type_name
            && self.nth_kind(1) == TokenKind::LParen
        {
            let name = self.expect_ident()?;
            let params = self.parse_params()?;
            let body = self.parse_body_or_semicolon();
            let end = body.map_or(self.previous_span(), |b| b.span);
            let def = ConstructorDef {
                is_native,
                name,
                params,
                body,
                span: start.merge(end),
            };
            return Some(Member::Constructor(self.arena.alloc(def)));
        }

        let ty = self.parse_type_expr()?;
        let name = self.expect_ident()?;

        if self.check(TokenKind::LParen)
            || (self.check(TokenKind::Amp) && self.nth_kind(1) == TokenKind::LParen)
        {
            let def = self.parse_function_tail(is_native, ty, name, start)?;
            return Some(Member::Method(self.arena.alloc(def)));
        }

        let def = self.parse_variables_tail(ty, name, start);
        Some(Member::Field(self.arena.alloc(def)))
    }

    fn parse_function_tail(
        &mut self,
        is_native: bool,
        return_type: TypeExpr<'ast>,
        name: Ident<'ast>,
        start: Span,
    ) -> Option<FunctionDef<'ast>> {
        let ref_marker = self.eat(TokenKind::Amp).is_some();
        let params = self.parse_params()?;
        let body = self.parse_body_or_semicolon();
        let end = body.map_or(self.previous_span(), |b| b.span);
        Some(FunctionDef {
            is_native,
            return_type,
            name,
            ref_marker,
            params,
            body,
            span: start.merge(end),
        })
    }

    fn parse_params(&mut self) -> Option<&'ast [Param<'ast>]> {
        self.eat(TokenKind::LParen)?;
        let mut params = Vec::new();

        if !self.check(TokenKind::RParen) {
            loop {
                let start = self.peek().span;
                let Some(ty) = self.parse_type_expr() else {
                    let span = self.peek().span;
                    self.issue(IssueKind::MissingTypeSpecifier, span);
                    break;
                };
                let Some(name) = self.expect_ident() else {
                    let span = self.peek().span;
                    self.issue(IssueKind::ExpectedDefinition, span);
                    break;
                };
                params.push(Param {
                    ty,
                    name,
                    span: start.merge(name.span),
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        if self.eat(TokenKind::RParen).is_none() {
            let span = self.peek().span;
            self.issue(IssueKind::MissingClosingParenthesis, span.before());
        }
        Some(self.arena.alloc_slice_copy(&params))
    }

    /// `{ ... }` gives a body; `;` gives none (a native or forward
    /// definition). Anything else is reported and treated as no body.
    fn parse_body_or_semicolon(&mut self) -> Option<CodeBlock<'ast>> {
        if self.check(TokenKind::LBrace) {
            return Some(self.parse_block());
        }
        self.expect_semicolon(IssueKind::ExpectedDefinition);
        None
    }

    fn parse_variables_tail(
        &mut self,
        ty: TypeExpr<'ast>,
        first_name: Ident<'ast>,
        start: Span,
    ) -> VariablesDef<'ast> {
        let mut variables = Vec::new();
        let mut name = first_name;
        loop {
            let initializer = if self.eat(TokenKind::Assign).is_some() {
                match self.parse_binary(0) {
                    Some(expr) => Some(expr),
                    None => {
                        let span = self.peek().span;
                        self.issue(IssueKind::MissingVariableInitializer, span.before());
                        None
                    }
                }
            } else {
                None
            };
            let span = match initializer {
                Some(expr) => name.span.merge(expr.span()),
                None => name.span,
            };
            variables.push(VariableDecl {
                name,
                initializer,
                span,
            });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            match self.expect_ident() {
                Some(next) => name = next,
                None => {
                    let span = self.peek().span;
                    self.issue(IssueKind::ExpectedDefinition, span);
                    break;
                }
            }
        }
        self.expect_semicolon(IssueKind::ExpectedDefinition);
        let end = self.previous_span();
        VariablesDef {
            ty,
            variables: self.arena.alloc_slice_copy(&variables),
            span: start.merge(end),
        }
    }

    fn parse_type_expr(&mut self) -> Option<TypeExpr<'ast>> {
        if !self.check(TokenKind::Identifier) {
            return None;
        }
        let token = self.advance();
        let name = Ident::new(token.lexeme, token.span);
        // `T&` is a reference type unless the `&` starts a function's
        // reference marker, which the callers disambiguate by lookahead.
        let is_reference =
            self.check(TokenKind::Amp) && self.nth_kind(1) != TokenKind::LParen;
        let mut span = token.span;
        if is_reference {
            span = span.merge(self.advance().span);
        }
        Some(TypeExpr {
            name,
            is_reference,
            span,
        })
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CodeBlock<'ast> {
        let start = self.advance().span; // consumes `{`
        let mut statements = Vec::new();

        loop {
            match self.kind() {
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    let span = self.peek().span;
                    self.issue(IssueKind::MissingClosingBrace, span);
                    break;
                }
                _ => match self.parse_stmt() {
                    Some(stmt) => statements.push(stmt),
                    None => {
                        let span = self.peek().span;
                        self.issue(IssueKind::ExpectedExpression, span);
                        self.sync_stmt();
                    }
                },
            }
        }
        let end = self.eat(TokenKind::RBrace).map_or(self.peek().span, |t| t.span);

        CodeBlock {
            statements: self.arena.alloc_slice_copy(&statements),
            span: start.merge(end),
        }
    }

    fn parse_stmt(&mut self) -> Option<Stmt<'ast>> {
        match self.kind() {
            TokenKind::LBrace => Some(Stmt::Block(self.parse_block())),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            // Two names in a row (with an optional `&` in between) start a
            // local variables definition; anything else is an expression.
            TokenKind::Identifier
                if self.nth_kind(1) == TokenKind::Identifier
                    || (self.nth_kind(1) == TokenKind::Amp
                        && self.nth_kind(2) == TokenKind::Identifier) =>
            {
                let start = self.peek().span;
                let ty = self.parse_type_expr()?;
                let name = self.expect_ident()?;
                let def = self.parse_variables_tail(ty, name, start);
                Some(Stmt::Variables(self.arena.alloc(def)))
            }
            _ => {
                let expr = self.parse_binary(0)?;
                self.expect_semicolon(IssueKind::ExpectedExpression);
                Some(Stmt::Expr(expr))
            }
        }
    }

    fn parse_if(&mut self) -> Option<Stmt<'ast>> {
        let start = self.advance().span; // `if`
        let condition = self.parse_condition();
        let then_branch = self.parse_branch()?;
        let (else_branch, end) = if self.eat(TokenKind::Else).is_some() {
            let branch = self.parse_branch()?;
            let span = branch.span();
            (Some(branch), span)
        } else {
            (None, then_branch.span())
        };

        let stmt = IfElseStmt {
            condition,
            then_branch: self.arena.alloc(then_branch),
            else_branch: else_branch.map(|b| &*self.arena.alloc(b)),
            span: start.merge(end),
        };
        Some(Stmt::IfElse(self.arena.alloc(stmt)))
    }

    fn parse_while(&mut self) -> Option<Stmt<'ast>> {
        let start = self.advance().span; // `while`
        let condition = self.parse_condition();
        let body = self.parse_branch()?;
        let stmt = WhileStmt {
            condition,
            body: self.arena.alloc(body),
            span: start.merge(body.span()),
        };
        Some(Stmt::While(self.arena.alloc(stmt)))
    }

    /// `( expr )` after `if`/`while`.
    fn parse_condition(&mut self) -> &'ast Expr<'ast> {
        if self.eat(TokenKind::LParen).is_none() {
            let span = self.peek().span;
            self.issue(IssueKind::ExpectedExpression, span);
            return self.arena.alloc(Expr::Missing(span));
        }
        let condition = match self.parse_binary(0) {
            Some(expr) => expr,
            None => {
                let span = self.peek().span;
                self.issue(IssueKind::ExpectedExpression, span);
                self.arena.alloc(Expr::Missing(span))
            }
        };
        if self.eat(TokenKind::RParen).is_none() {
            let span = self.peek().span;
            self.issue(IssueKind::MissingClosingParenthesis, span.before());
        }
        condition
    }

    fn parse_branch(&mut self) -> Option<Stmt<'ast>> {
        match self.parse_stmt() {
            Some(stmt) => Some(stmt),
            None => {
                let span = self.peek().span;
                self.issue(IssueKind::ExpectedExpression, span);
                self.sync_stmt();
                None
            }
        }
    }

    fn parse_return(&mut self) -> Option<Stmt<'ast>> {
        let start = self.advance().span; // `return`
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            self.parse_binary(0)
        };
        self.expect_semicolon(IssueKind::ExpectedExpression);
        let end = value.map_or(start, |v| v.span());
        let stmt = ReturnStmt {
            value,
            span: start.merge(end),
        };
        Some(Stmt::Return(self.arena.alloc(stmt)))
    }

    // =========================================================================
    // Expressions (Pratt)
    // =========================================================================

    fn infix_op(kind: TokenKind) -> Option<InfixOp> {
        Some(match kind {
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Less => InfixOp::Less,
            TokenKind::Greater => InfixOp::Greater,
            TokenKind::LessEqual => InfixOp::LessEqual,
            TokenKind::GreaterEqual => InfixOp::GreaterEqual,
            TokenKind::EqualEqual => InfixOp::Equal,
            TokenKind::NotEqual => InfixOp::NotEqual,
            TokenKind::AndAnd => InfixOp::And,
            TokenKind::OrOr => InfixOp::Or,
            TokenKind::Assign => InfixOp::Assign,
            _ => return None,
        })
    }

    /// Parse an expression with operators binding at least `min_prec`.
    ///
    /// Returns `None` only when nothing that can start an expression is
    /// present; a missing *right* operand still yields an infix node with a
    /// `Missing` child (the analyser reports E0006 there).
    fn parse_binary(&mut self, min_prec: u8) -> Option<&'ast Expr<'ast>> {
        let mut left = self.parse_prefix()?;

        while let Some(op) = Self::infix_op(self.kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let op_token = self.advance();
            let next_min = if op.is_right_associative() {
                prec
            } else {
                prec + 1
            };
            let right = match self.parse_binary(next_min) {
                Some(expr) => expr,
                None => &*self.arena.alloc(Expr::Missing(op_token.span.after())),
            };
            let span = left.span().merge(right.span());
            left = self.arena.alloc(Expr::Infix(self.arena.alloc(InfixExpr {
                left,
                op,
                op_span: op_token.span,
                right,
                span,
            })));
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<&'ast Expr<'ast>> {
        let op = match self.kind() {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Minus),
            _ => None,
        };
        if let Some(op) = op {
            let op_token = self.advance();
            let operand = match self.parse_prefix() {
                Some(expr) => expr,
                None => &*self.arena.alloc(Expr::Missing(op_token.span.after())),
            };
            let span = op_token.span.merge(operand.span());
            let expr = Expr::Prefix(self.arena.alloc(PrefixExpr { op, operand, span }));
            return Some(self.arena.alloc(expr));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Option<&'ast Expr<'ast>> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.kind() {
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenKind::RParen) {
                        loop {
                            match self.parse_binary(0) {
                                Some(arg) => args.push(*arg),
                                None => {
                                    let span = self.peek().span;
                                    self.issue(IssueKind::ExpectedExpression, span);
                                    break;
                                }
                            }
                            if self.eat(TokenKind::Comma).is_none() {
                                break;
                            }
                        }
                    }
                    let end = match self.eat(TokenKind::RParen) {
                        Some(token) => token.span,
                        None => {
                            let span = self.peek().span;
                            self.issue(IssueKind::MissingClosingParenthesis, span.before());
                            span
                        }
                    };
                    let span = expr.span().merge(end);
                    expr = self.arena.alloc(Expr::Call(self.arena.alloc(CallExpr {
                        callee: expr,
                        args: self.arena.alloc_slice_copy(&args),
                        span,
                    })));
                }
                TokenKind::Dot => {
                    self.advance();
                    let Some(name) = self.expect_ident() else {
                        let span = self.peek().span;
                        self.issue(IssueKind::ExpectedExpression, span);
                        break;
                    };
                    let span = expr.span().merge(name.span);
                    expr = self.arena.alloc(Expr::Member(self.arena.alloc(MemberExpr {
                        object: expr,
                        name,
                        span,
                    })));
                }
                _ => break,
            }
        }

        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<&'ast Expr<'ast>> {
        let token = self.peek();
        let expr = match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                Expr::IntLiteral(LiteralExpr {
                    text: token.lexeme,
                    span: token.span,
                })
            }
            TokenKind::DoubleLiteral => {
                self.advance();
                Expr::DoubleLiteral(LiteralExpr {
                    text: token.lexeme,
                    span: token.span,
                })
            }
            TokenKind::True => {
                self.advance();
                Expr::BoolLiteral(true, token.span)
            }
            TokenKind::False => {
                self.advance();
                Expr::BoolLiteral(false, token.span)
            }
            TokenKind::This => {
                self.advance();
                Expr::This(token.span)
            }
            TokenKind::Identifier => {
                self.advance();
                Expr::Symbol(Ident::new(token.lexeme, token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = match self.parse_binary(0) {
                    Some(expr) => expr,
                    None => {
                        let span = self.peek().span;
                        self.issue(IssueKind::ExpectedExpression, span);
                        &*self.arena.alloc(Expr::Missing(span))
                    }
                };
                let end = match self.eat(TokenKind::RParen) {
                    Some(t) => t.span,
                    None => {
                        let span = self.peek().span;
                        self.issue(IssueKind::MissingClosingParenthesis, span.before());
                        span
                    }
                };
                Expr::Paren(self.arena.alloc(ParenExpr {
                    inner,
                    span: token.span.merge(end),
                }))
            }
            _ => return None,
        };
        Some(self.arena.alloc(expr))
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip to the next plausible start of a top-level definition.
    fn sync_definition(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::Class | TokenKind::Native => break,
                TokenKind::Semicolon | TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next member boundary inside a type body.
    fn sync_member(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::RBrace => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next statement boundary.
    fn sync_stmt(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::RBrace => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok<'ast>(arena: &'ast Bump, source: &'ast str) -> Program<'ast> {
        let (program, issues) = parse(arena, source);
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        program
    }

    #[test]
    fn parses_main() {
        let arena = Bump::new();
        let program = parse_ok(&arena, "void main() { int x = 5; writeIntLn(x); }");
        assert_eq!(program.definitions.len(), 1);
        let GlobalDef::Function(func) = program.definitions[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(func.name.name, "main");
        assert!(!func.is_native);
        let body = func.body.expect("main has a body");
        assert_eq!(body.statements.len(), 2);
        assert!(matches!(body.statements[0], Stmt::Variables(_)));
        assert!(matches!(body.statements[1], Stmt::Expr(_)));
    }

    #[test]
    fn parses_class_with_members() {
        let arena = Bump::new();
        let source = "class Vector2 {
            int x;
            int y;
            Vector2(int x, int y) { this.x = x; this.y = y; }
            int lengthSquared() { return x * x + y * y; }
        }";
        let program = parse_ok(&arena, source);
        let GlobalDef::Type(def) = program.definitions[0] else {
            panic!("expected a type definition");
        };
        assert_eq!(def.name.name, "Vector2");
        assert_eq!(def.members.len(), 4);
        assert!(matches!(def.members[0], Member::Field(_)));
        assert!(matches!(def.members[2], Member::Constructor(_)));
        assert!(matches!(def.members[3], Member::Method(_)));
    }

    #[test]
    fn parses_native_function_without_body() {
        let arena = Bump::new();
        let program = parse_ok(&arena, "native void println(int value);");
        let GlobalDef::Function(func) = program.definitions[0] else {
            panic!("expected a function definition");
        };
        assert!(func.is_native);
        assert!(func.body.is_none());
        assert_eq!(func.params.len(), 1);
        assert_eq!(func.params[0].ty.name.name, "int");
    }

    #[test]
    fn reference_types_and_markers() {
        let arena = Bump::new();
        let program = parse_ok(&arena, "void reset&(int value); int& pick(int& a, int& b) { return a; }");
        let GlobalDef::Function(reset) = program.definitions[0] else {
            panic!("expected a function");
        };
        assert!(reset.ref_marker);
        assert!(!reset.return_type.is_reference);
        let GlobalDef::Function(pick) = program.definitions[1] else {
            panic!("expected a function");
        };
        assert!(pick.return_type.is_reference);
        assert!(pick.params.iter().all(|p| p.ty.is_reference));
    }

    #[test]
    fn precedence_groups_multiplication_first() {
        let arena = Bump::new();
        let program = parse_ok(&arena, "int x = 1 + 2 * 3;");
        let GlobalDef::Variables(def) = program.definitions[0] else {
            panic!("expected variables");
        };
        let Expr::Infix(add) = def.variables[0].initializer.unwrap() else {
            panic!("expected infix");
        };
        assert_eq!(add.op, InfixOp::Add);
        assert!(matches!(add.right, Expr::Infix(mul) if mul.op == InfixOp::Mul));
    }

    #[test]
    fn assignment_is_right_associative() {
        let arena = Bump::new();
        let program = parse_ok(&arena, "void f() { a = b = c; }");
        let GlobalDef::Function(func) = program.definitions[0] else {
            panic!("expected function");
        };
        let Stmt::Expr(Expr::Infix(outer)) = func.body.unwrap().statements[0] else {
            panic!("expected expression statement");
        };
        assert_eq!(outer.op, InfixOp::Assign);
        assert!(matches!(outer.left, Expr::Symbol(_)));
        assert!(matches!(outer.right, Expr::Infix(inner) if inner.op == InfixOp::Assign));
    }

    #[test]
    fn missing_right_operand_becomes_placeholder() {
        let arena = Bump::new();
        let (program, issues) = parse(&arena, "void f() { a = ; }");
        // No parser issue: the analyser reports the missing operand.
        assert!(issues.is_empty(), "{issues:?}");
        let GlobalDef::Function(func) = program.definitions[0] else {
            panic!("expected function");
        };
        let Stmt::Expr(Expr::Infix(assign)) = func.body.unwrap().statements[0] else {
            panic!("expected expression statement");
        };
        assert!(matches!(assign.right, Expr::Missing(_)));
    }

    #[test]
    fn missing_initializer_is_reported() {
        let arena = Bump::new();
        let (_, issues) = parse(&arena, "void f() { int x = ; }");
        // `int x = ;` heads a variables definition, so the parser owns the
        // diagnostic here.
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0005");
    }

    #[test]
    fn keyword_as_identifier_is_reported() {
        let arena = Bump::new();
        let (_, issues) = parse(&arena, "void f() { g().while; }");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0010");
    }

    #[test]
    fn missing_closing_paren_is_reported() {
        let arena = Bump::new();
        let (_, issues) = parse(&arena, "void f() { g(1; }");
        assert!(issues.iter().any(|i| i.code() == "E0008"), "{issues:?}");
    }

    #[test]
    fn recovers_after_bad_definition() {
        let arena = Bump::new();
        let (program, issues) = parse(&arena, "???; void main() { }");
        assert!(!issues.is_empty());
        assert!(program
            .definitions
            .iter()
            .any(|d| matches!(d, GlobalDef::Function(f) if f.name.name == "main")));
    }

    #[test]
    fn if_else_and_while() {
        let arena = Bump::new();
        let program = parse_ok(
            &arena,
            "void f() { if (true) { } else { } while (false) g(); }",
        );
        let GlobalDef::Function(func) = program.definitions[0] else {
            panic!("expected function");
        };
        let statements = func.body.unwrap().statements;
        assert!(matches!(statements[0], Stmt::IfElse(s) if s.else_branch.is_some()));
        assert!(matches!(statements[1], Stmt::While(_)));
    }
}
