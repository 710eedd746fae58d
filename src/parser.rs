//! The declaration-level recursive-descent scanner.
//!
//! [Parser] drives a [Tokenizer] over a whole source buffer, recognizing annotation macros
//! (`CLASS`/`ENUM`/`FUNCTION`/`PROPERTY`/custom) and ordinary C++ syntax it needs to walk
//! through or over, emitting one JSON object per recognized declaration via a [JsonSink].
//!
//! Grounded directly on the original scanner's `Parser` (`ParseDeclaration`, `ParseEnum`,
//! `ParseClass`, `ParseFunction`, `ParseProperty`, `ParseNamespace`, `ParseCustomMacro`,
//! `ParseMacroMeta`/`ParseMetaSequence`, `ParseDirective`, `SkipDeclaration`). That scanner
//! used `throw`/uncaught exceptions for anything it considered a hard parse error; here
//! every such site returns `Err(ScanError)` instead, and the caller decides what to do with
//! a partially emitted document.
use crate::config::MacroConfig;
use crate::error::{ScanError, ScanErrorKind};
use crate::json::{JsonSink, ValueSink};
use crate::scope::{AccessKind, Scope, ScopeKind, ScopeStack};
use crate::token::{ConstKind, ConstValue, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::type_node::{FunctionArgument, TypeNode};
use crate::util::Log;

/// Parse `source` with the given macro configuration and return the resulting document as
/// a `serde_json::Value`. A convenience wrapper around [Parser] for callers that just want
/// an in-memory document (the CLI binary and most tests).
pub fn scan(source: &str, config: &MacroConfig) -> Result<serde_json::Value, ScanError> {
    let mut sink = ValueSink::new();
    {
        let mut parser = Parser::new(source, config, &mut sink);
        parser.parse()?;
    }
    Ok(sink.into_value().unwrap_or(serde_json::Value::Array(Vec::new())))
}

fn access_control_from_text(text: &str) -> Option<AccessKind> {
    match text {
        "public" => Some(AccessKind::Public),
        "protected" => Some(AccessKind::Protected),
        "private" => Some(AccessKind::Private),
        _ => None,
    }
}

fn access_control_from_token(token: &Token) -> Option<AccessKind> {
    if token.kind != TokenKind::Identifier {
        return None;
    }
    access_control_from_text(&token.text)
}

/// Drives a [Tokenizer] over one source buffer, writing recognized declarations to a
/// [JsonSink].
pub struct Parser<'a, 's> {
    tokenizer: Tokenizer<'a>,
    config: &'a MacroConfig,
    scopes: ScopeStack,
    sink: &'s mut dyn JsonSink,
}

impl<'a, 's> Parser<'a, 's> {
    pub fn new(source: &'a str, config: &'a MacroConfig, sink: &'s mut dyn JsonSink) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            config,
            scopes: ScopeStack::new(),
            sink,
        }
    }

    pub fn set_log(&mut self, log: Log<&'static str>) {
        self.tokenizer.set_log(log);
    }

    /// Parse the whole buffer, emitting a top-level JSON array of declarations.
    ///
    /// The closing array element is only written on success: a scan that ends in error
    /// leaves the sink holding a partial, intentionally-unusable document.
    pub fn parse(&mut self) -> Result<(), ScanError> {
        self.sink.start_array();

        while let Some(token) = self.tokenizer.get_token(false, false) {
            self.parse_declaration(token)?;
        }

        if self.tokenizer.has_error() {
            return Err(self.err(ScanErrorKind::Tokenization, "tokenization failed"));
        }

        self.sink.end_array();
        Ok(())
    }

    fn err(&self, kind: ScanErrorKind, message: impl Into<String>) -> ScanError {
        ScanError::new(kind, self.tokenizer.current_line(), message)
    }

    fn require_symbol(&mut self, text: &str) -> Result<(), ScanError> {
        if self.tokenizer.require_symbol(text) {
            Ok(())
        } else {
            Err(self.err(ScanErrorKind::RequiredSymbolMissing, format!("expected '{}'", text)))
        }
    }

    fn require_identifier(&mut self, text: &str) -> Result<(), ScanError> {
        if self.tokenizer.require_identifier(text) {
            Ok(())
        } else {
            Err(self.err(ScanErrorKind::RequiredSymbolMissing, format!("expected '{}'", text)))
        }
    }

    /// Like [Self::require_symbol], but reads with `separate_braces = true` so a closing `>`
    /// nested inside another template's argument list splits off a fused `>>` instead of
    /// swallowing it whole.
    fn require_symbol_separate_braces(&mut self, text: &str) -> Result<(), ScanError> {
        if self.tokenizer.require_symbol_separate_braces(text) {
            Ok(())
        } else {
            Err(self.err(ScanErrorKind::RequiredSymbolMissing, format!("expected '{}'", text)))
        }
    }

    fn parse_declaration(&mut self, token: Token) -> Result<(), ScanError> {
        if token.is_symbol("#") {
            return self.parse_directive();
        }
        if token.is_symbol(";") {
            return Ok(());
        }
        if token.is_identifier(&self.config.enum_macro) {
            return self.parse_enum(&token);
        }
        if token.is_identifier(&self.config.class_macro) {
            return self.parse_class(&token);
        }
        if token.kind == TokenKind::Identifier && self.config.is_function_macro(&token.text) {
            let macro_name = token.text.clone();
            return self.parse_function(&token, &macro_name);
        }
        if token.is_identifier(&self.config.property_macro) {
            return self.parse_property(&token);
        }
        if token.is_identifier("namespace") {
            return self.parse_namespace();
        }
        if let Some(access) = access_control_from_token(&token) {
            self.scopes.set_access(access);
            return self.require_symbol(":");
        }
        if token.kind == TokenKind::Identifier && self.config.is_custom_macro(&token.text) {
            let macro_name = token.text.clone();
            return self.parse_custom_macro(&token, &macro_name);
        }
        self.skip_declaration(token)
    }

    fn parse_directive(&mut self) -> Result<(), ScanError> {
        let directive = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "missing compiler directive after '#'"))?;

        let multi_line = directive.text == "define";

        if directive.text == "include" {
            if let Some(path_token) = self.tokenizer.get_token(true, false) {
                self.sink.start_object();
                self.sink.key("type");
                self.sink.string("include");
                self.sink.key("file");
                self.sink.string(&path_token.text);
                self.sink.end_object();
            }
        }

        loop {
            let last = self.tokenizer.skip_to_end_of_line();
            if !(multi_line && last == b'\\') {
                break;
            }
        }

        Ok(())
    }

    /// Skip an unrecognized declaration up to its closing `;` or balanced `}`.
    ///
    /// `_leading` mirrors a quirk of the original scanner's `SkipDeclaration`: it always
    /// re-reads the next token itself rather than inspecting the one the caller already
    /// consumed, so that already-consumed token is never checked against the brace/semicolon
    /// bookkeeping below.
    fn skip_declaration(&mut self, _leading: Token) -> Result<(), ScanError> {
        let mut depth = 0i32;
        while let Some(token) = self.tokenizer.get_token(false, false) {
            if token.is_symbol(";") && depth == 0 {
                break;
            }
            if token.is_symbol("{") {
                depth += 1;
            }
            if token.is_symbol("}") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        Ok(())
    }

    fn parse_comment(&mut self) {
        let text = self
            .tokenizer
            .last_comment()
            .filter(|c| c.end_line == self.tokenizer.current_line())
            .map(|c| c.text.clone());
        if let Some(text) = text {
            if !text.is_empty() {
                self.sink.key("comment");
                self.sink.string(&text);
            }
        }
    }

    fn write_token(&mut self, token: &Token) {
        if token.kind != TokenKind::Const {
            self.sink.string(&token.text);
            return;
        }
        match (&token.const_kind, &token.const_value) {
            (Some(ConstKind::Boolean), Some(ConstValue::Boolean(v))) => self.sink.bool(*v),
            (Some(ConstKind::UInt32), Some(ConstValue::UInt32(v))) => self.sink.uint(*v as u64),
            (Some(ConstKind::Int32), Some(ConstValue::Int32(v))) => self.sink.int(*v as i64),
            (Some(ConstKind::UInt64), Some(ConstValue::UInt64(v))) => self.sink.uint(*v),
            (Some(ConstKind::Int64), Some(ConstValue::Int64(v))) => self.sink.int(*v),
            (Some(ConstKind::Real), Some(ConstValue::Real(v))) => self.sink.double(*v),
            (Some(ConstKind::String), Some(ConstValue::String(v))) => self.sink.string(v),
            _ => self.sink.string(&token.text),
        }
    }

    fn write_current_access_control_type(&mut self) {
        if self.scopes.current().kind != ScopeKind::Class {
            return;
        }
        let access = self.scopes.current().access;
        self.write_access_control_type(access);
    }

    fn write_access_control_type(&mut self, access: AccessKind) {
        self.sink.key("access");
        self.sink.string(match access {
            AccessKind::Public => "public",
            AccessKind::Protected => "protected",
            AccessKind::Private => "private",
        });
    }

    fn parse_macro_meta(&mut self) -> Result<(), ScanError> {
        self.sink.key("meta");
        self.require_symbol("(")?;
        self.parse_meta_sequence()?;
        self.tokenizer.match_symbol(";");
        Ok(())
    }

    fn parse_meta_sequence(&mut self) -> Result<(), ScanError> {
        self.sink.start_object();

        if !self.tokenizer.match_symbol(")") {
            loop {
                let key_token = self
                    .tokenizer
                    .get_identifier()
                    .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected identifier in meta sequence"))?;
                self.sink.key(&key_token.text);

                if self.tokenizer.match_symbol("=") {
                    let value_token = self
                        .tokenizer
                        .get_token(false, false)
                        .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected token after '=' in meta sequence"))?;
                    self.write_token(&value_token);
                } else if self.tokenizer.match_symbol("(") {
                    self.parse_meta_sequence()?;
                } else {
                    self.sink.null();
                }

                if !self.tokenizer.match_symbol(",") {
                    break;
                }
            }
            self.tokenizer.match_symbol(")");
        }

        self.sink.end_object();
        Ok(())
    }

    fn parse_namespace(&mut self) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("namespace");

        let name_token = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "missing namespace name"))?;
        self.sink.key("name");
        self.sink.string(&name_token.text);

        self.require_symbol("{")?;

        self.sink.key("members");
        self.sink.start_array();

        self.scopes.push(Scope::namespace(name_token.text.clone()), name_token.start_line)?;

        while !self.tokenizer.match_symbol("}") {
            let token = self
                .tokenizer
                .get_token(false, false)
                .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "unexpected end of file inside namespace"))?;
            self.parse_declaration(token)?;
        }

        self.scopes.pop();
        self.sink.end_array();
        self.sink.end_object();
        Ok(())
    }

    fn parse_class(&mut self, start_token: &Token) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("class");
        self.sink.key("line");
        self.sink.uint(start_token.start_line as u64);

        self.write_current_access_control_type();
        self.parse_comment();
        self.parse_macro_meta()?;

        if self.tokenizer.match_identifier("template") {
            self.parse_class_template()?;
        }

        let is_struct = self.tokenizer.match_identifier("struct");
        if !(self.tokenizer.match_identifier("class") || is_struct) {
            return Err(self.err(ScanErrorKind::UnexpectedToken, "missing identifier 'class' or 'struct'"));
        }

        self.sink.key("isstruct");
        self.sink.bool(is_struct);

        let class_name = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "missing class name"))?;
        self.sink.key("name");
        self.sink.string(&class_name.text);

        if self.tokenizer.match_symbol(":") {
            self.sink.key("parents");
            self.sink.start_array();

            loop {
                self.sink.start_object();

                let access_or_name = self
                    .tokenizer
                    .get_identifier()
                    .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "missing base class or access specifier"))?;

                let access = match access_control_from_text(&access_or_name.text) {
                    Some(access) => access,
                    None => {
                        self.tokenizer.unget_token(&access_or_name);
                        AccessKind::Private
                    }
                };
                self.write_access_control_type(access);

                self.sink.key("name");
                self.parse_type()?;

                self.sink.end_object();

                if !self.tokenizer.match_symbol(",") {
                    break;
                }
            }

            self.sink.end_array();
        }

        self.require_symbol("{")?;

        self.sink.key("members");
        self.sink.start_array();

        let default_access = if is_struct { AccessKind::Public } else { AccessKind::Private };
        self.scopes
            .push(Scope::class(class_name.text.clone(), default_access), class_name.start_line)?;

        while !self.tokenizer.match_symbol("}") {
            let token = self
                .tokenizer
                .get_token(false, false)
                .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "unexpected end of file inside class body"))?;
            self.parse_declaration(token)?;
        }

        self.scopes.pop();
        self.sink.end_array();

        self.require_symbol(";")?;

        self.sink.end_object();
        Ok(())
    }

    fn parse_class_template(&mut self) -> Result<(), ScanError> {
        self.sink.key("template");
        self.sink.start_object();

        self.require_symbol("<")?;

        self.sink.key("arguments");
        self.sink.start_array();

        loop {
            self.parse_class_template_argument()?;
            if !self.tokenizer.match_symbol(",") {
                break;
            }
        }

        self.sink.end_array();

        self.require_symbol_separate_braces(">")?;
        self.sink.end_object();
        Ok(())
    }

    fn parse_class_template_argument(&mut self) -> Result<(), ScanError> {
        self.sink.start_object();

        let kind_token = self
            .tokenizer
            .get_token(false, false)
            .filter(|t| t.kind == TokenKind::Identifier && (t.text == "class" || t.text == "typename"))
            .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected 'class' or 'typename' in template argument"))?;
        self.sink.key("typeParameterKey");
        self.sink.string(&kind_token.text);

        let name_token = self
            .tokenizer
            .get_token(false, false)
            .filter(|t| t.kind == TokenKind::Identifier)
            .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected identifier in template argument"))?;
        self.sink.key("name");
        self.sink.string(&name_token.text);

        if self.tokenizer.match_symbol("=") {
            self.sink.key("defaultType");
            self.parse_type()?;
        }

        self.sink.end_object();
        Ok(())
    }

    fn parse_property(&mut self, start_token: &Token) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("property");
        self.sink.key("line");
        self.sink.uint(start_token.start_line as u64);

        self.parse_macro_meta()?;
        self.write_current_access_control_type();

        let mut is_mutable = false;
        let mut is_static = false;
        loop {
            if !is_mutable && self.tokenizer.match_identifier("mutable") {
                is_mutable = true;
            } else if !is_static && self.tokenizer.match_identifier("static") {
                is_static = true;
            } else {
                break;
            }
        }

        if is_mutable {
            self.sink.key("mutable");
            self.sink.bool(true);
        }
        if is_static {
            self.sink.key("static");
            self.sink.bool(true);
        }

        self.sink.key("dataType");
        self.parse_type()?;

        let name_token = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "expected a property name"))?;
        self.sink.key("name");
        self.sink.string(&name_token.text);

        self.sink.key("elements");
        if self.tokenizer.match_symbol("[") {
            let array_token = self
                .tokenizer
                .get_const()
                .or_else(|| self.tokenizer.get_identifier())
                .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected an array size"))?;
            self.sink.string(&array_token.text);
            self.require_symbol("]")?;
        } else {
            self.sink.null();
        }

        self.sink.end_object();

        while let Some(t) = self.tokenizer.get_token(false, false) {
            if t.is_symbol(";") {
                break;
            }
        }

        Ok(())
    }

    fn parse_function(&mut self, start_token: &Token, macro_name: &str) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("function");
        self.sink.key("macro");
        self.sink.string(macro_name);
        self.sink.key("line");
        self.sink.uint(start_token.start_line as u64);

        self.parse_comment();
        self.parse_macro_meta()?;
        self.write_current_access_control_type();

        let mut is_virtual = false;
        let mut is_inline = false;
        let mut is_constexpr = false;
        let mut is_static = false;
        loop {
            if !is_virtual && self.tokenizer.match_identifier("virtual") {
                is_virtual = true;
            } else if !is_inline && self.tokenizer.match_identifier("inline") {
                is_inline = true;
            } else if !is_constexpr && self.tokenizer.match_identifier("constexpr") {
                is_constexpr = true;
            } else if !is_static && self.tokenizer.match_identifier("static") {
                is_static = true;
            } else {
                break;
            }
        }

        if is_virtual {
            self.sink.key("virtual");
            self.sink.bool(true);
        }
        if is_inline {
            self.sink.key("inline");
            self.sink.bool(true);
        }
        if is_constexpr {
            self.sink.key("constexpr");
            self.sink.bool(true);
        }
        if is_static {
            self.sink.key("static");
            self.sink.bool(true);
        }

        self.sink.key("returnType");
        self.parse_type()?;

        let name_token = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "expected method name"))?;
        self.sink.key("name");
        self.sink.string(&name_token.text);

        self.sink.key("arguments");
        self.sink.start_array();

        self.tokenizer.match_symbol("(");

        if !self.tokenizer.match_symbol(")") {
            loop {
                self.sink.start_object();

                self.sink.key("type");
                self.parse_type()?;

                let arg_name = self
                    .tokenizer
                    .get_identifier()
                    .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected argument name"))?;
                self.sink.key("name");
                self.sink.string(&arg_name.text);

                if self.tokenizer.match_symbol("=") {
                    self.sink.key("defaultValue");
                    self.parse_default_value()?;
                }

                self.sink.end_object();

                if !self.tokenizer.match_symbol(",") {
                    break;
                }
            }
            self.tokenizer.match_symbol(")");
        }

        self.sink.end_array();

        if self.tokenizer.match_identifier("const") {
            self.sink.key("const");
            self.sink.bool(true);
        }

        if self.tokenizer.match_symbol("=") {
            let zero = self
                .tokenizer
                .get_token(false, false)
                .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected '0' after '=' in pure specifier"))?;
            if zero.text != "0" {
                return Err(self.err(ScanErrorKind::UnexpectedToken, "expected '0' after '=' in pure specifier"));
            }
            self.sink.key("abstract");
            self.sink.bool(true);
        }

        self.sink.end_object();

        self.skip_declaration(Token::none())
    }

    /// A default argument value: a single constant token is written decoded, anything else
    /// is re-joined as literal source text up to the next `,` or `)`.
    fn parse_default_value(&mut self) -> Result<(), ScanError> {
        let mut token = self
            .tokenizer
            .get_token(false, false)
            .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected default value"))?;

        if token.kind == TokenKind::Const {
            self.write_token(&token);
            return Ok(());
        }

        let mut text = String::new();
        loop {
            if token.is_symbol(",") || token.is_symbol(")") {
                self.tokenizer.unget_token(&token);
                break;
            }
            text.push_str(&token.text);
            match self.tokenizer.get_token(false, false) {
                Some(next) => token = next,
                None => break,
            }
        }
        self.sink.string(&text);
        Ok(())
    }

    fn parse_custom_macro(&mut self, start_token: &Token, macro_name: &str) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("macro");
        self.sink.key("name");
        self.sink.string(macro_name);
        self.sink.key("line");
        self.sink.uint(start_token.start_line as u64);

        self.write_current_access_control_type();
        self.parse_macro_meta()?;

        self.sink.end_object();
        Ok(())
    }

    fn parse_type(&mut self) -> Result<(), ScanError> {
        let node = self.parse_type_node()?;
        node.write(self.sink);
        Ok(())
    }

    fn parse_type_node(&mut self) -> Result<TypeNode, ScanError> {
        let mut is_const = false;
        let mut is_volatile = false;
        let mut is_mutable = false;
        loop {
            if !is_const && self.tokenizer.match_identifier("const") {
                is_const = true;
            } else if !is_volatile && self.tokenizer.match_identifier("volatile") {
                is_volatile = true;
            } else if !is_mutable && self.tokenizer.match_identifier("mutable") {
                is_mutable = true;
            } else {
                break;
            }
        }

        let declarator = self.parse_type_node_declarator()?;
        is_const |= self.tokenizer.match_identifier("const");

        let mut node = if self.tokenizer.match_symbol("<") {
            let mut arguments = Vec::new();
            loop {
                arguments.push(self.parse_type_node()?);
                if !self.tokenizer.match_symbol(",") {
                    break;
                }
            }
            self.require_symbol_separate_braces(">")?;
            TypeNode::template(declarator, arguments)
        } else {
            TypeNode::literal(declarator)
        };
        node.qualifiers.is_const = is_const;

        loop {
            match self.tokenizer.get_token(false, false) {
                Some(t) if t.is_symbol("&") => node = TypeNode::reference(node),
                Some(t) if t.is_symbol("&&") => node = TypeNode::lreference(node),
                Some(t) if t.is_symbol("*") => node = TypeNode::pointer(node),
                Some(t) => {
                    self.tokenizer.unget_token(&t);
                    break;
                }
                None => break,
            }
            if self.tokenizer.match_identifier("const") {
                node.qualifiers.is_const = true;
            }
        }

        if self.tokenizer.match_symbol("(") {
            node = self.parse_function_pointer_tail(node)?;
        }

        node.qualifiers.is_volatile = is_volatile;
        node.qualifiers.is_mutable = is_mutable;

        Ok(node)
    }

    /// Parses the tail of `void(*)(int, char)`-style function pointer types, having
    /// already consumed the opening `(` of the `(*)` group.
    fn parse_function_pointer_tail(&mut self, returns: TypeNode) -> Result<TypeNode, ScanError> {
        if self.tokenizer.match_symbol("*") {
            // Optional pointer-to-function variable name, discarded.
            self.tokenizer.get_identifier();
            self.require_symbol(")")?;
        }

        let mut arguments = Vec::new();
        if !self.tokenizer.match_symbol(")") {
            loop {
                let arg_type = self.parse_type_node()?;
                let name = match self.tokenizer.get_token(false, false) {
                    Some(t) if t.kind == TokenKind::Identifier => Some(t.text),
                    Some(t) => {
                        self.tokenizer.unget_token(&t);
                        None
                    }
                    None => return Err(self.err(ScanErrorKind::UnexpectedToken, "unexpected end of file in argument list")),
                };
                arguments.push(FunctionArgument { name, ty: arg_type });
                if !self.tokenizer.match_symbol(",") {
                    break;
                }
            }
            self.require_symbol(")")?;
        }

        Ok(TypeNode::function(returns, arguments))
    }

    fn parse_type_node_declarator(&mut self) -> Result<String, ScanError> {
        self.tokenizer.match_identifier("class");
        self.tokenizer.match_identifier("struct");
        self.tokenizer.match_identifier("typename");

        let mut declarator = String::new();
        let mut first = true;
        loop {
            if self.tokenizer.match_symbol("::") {
                declarator.push_str("::");
            } else if !first {
                break;
            }
            first = false;

            let ident = self
                .tokenizer
                .get_identifier()
                .ok_or_else(|| self.err(ScanErrorKind::UnexpectedToken, "expected identifier in type name"))?;
            declarator.push_str(&ident.text);
        }

        Ok(declarator)
    }

    fn parse_enum(&mut self, start_token: &Token) -> Result<(), ScanError> {
        self.sink.start_object();
        self.sink.key("type");
        self.sink.string("enum");
        self.sink.key("line");
        self.sink.uint(start_token.start_line as u64);

        self.write_current_access_control_type();

        self.parse_macro_meta()?;
        self.require_identifier("enum")?;

        let is_enum_class = self.tokenizer.match_identifier("class");

        let enum_token = self
            .tokenizer
            .get_identifier()
            .ok_or_else(|| self.err(ScanErrorKind::MissingName, "missing enum name"))?;
        self.sink.key("name");
        self.sink.string(&enum_token.text);

        if is_enum_class {
            self.sink.key("cxxclass");
            self.sink.bool(true);
        }

        if is_enum_class && self.tokenizer.match_symbol(":") {
            let base_token = self
                .tokenizer
                .get_identifier()
                .ok_or_else(|| self.err(ScanErrorKind::MissingName, "missing enum base type after ':'"))?;
            self.sink.key("base");
            self.sink.string(&base_token.text);
        }

        self.require_symbol("{")?;

        self.sink.key("members");
        self.sink.start_array();

        while let Some(member) = self.tokenizer.get_identifier() {
            self.sink.start_object();
            self.sink.key("key");
            self.sink.string(&member.text);

            if self.tokenizer.match_symbol("=") {
                let mut value = String::new();
                while let Some(t) = self.tokenizer.get_token(false, false) {
                    if t.kind == TokenKind::Symbol && (t.text == "," || t.text == "}") {
                        self.tokenizer.unget_token(&t);
                        break;
                    }
                    value.push_str(&t.text);
                }
                self.sink.key("value");
                self.sink.string(&value);
            }

            self.sink.end_object();

            if !self.tokenizer.match_symbol(",") {
                break;
            }
        }

        self.require_symbol("}")?;
        self.sink.end_array();

        self.tokenizer.match_symbol(";");

        self.sink.end_object();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_class_with_base_and_values() {
        let source = "ENUM()\nenum class Color : int\n{\n  Red,\n  Green = 2\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        assert_eq!(value[0]["type"], "enum");
        assert_eq!(value[0]["name"], "Color");
        assert_eq!(value[0]["cxxclass"], true);
        assert_eq!(value[0]["base"], "int");
        assert_eq!(value[0]["members"][0]["key"], "Red");
        assert_eq!(value[0]["members"][1]["key"], "Green");
        assert_eq!(value[0]["members"][1]["value"], "2");
    }

    #[test]
    fn class_with_public_property() {
        let source = "CLASS()\nclass Widget\n{\npublic:\n  PROPERTY()\n  int count;\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        assert_eq!(value[0]["type"], "class");
        assert_eq!(value[0]["isstruct"], false);
        assert_eq!(value[0]["name"], "Widget");

        let property = &value[0]["members"][0];
        assert_eq!(property["type"], "property");
        assert_eq!(property["access"], "public");
        assert_eq!(property["dataType"]["type"], "literal");
        assert_eq!(property["dataType"]["name"], "int");
        assert_eq!(property["name"], "count");
        assert!(property["elements"].is_null());
    }

    #[test]
    fn struct_member_defaults_to_public_access() {
        let source = "CLASS()\nstruct Point\n{\n  PROPERTY()\n  int x;\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();
        assert_eq!(value[0]["isstruct"], true);
        assert_eq!(value[0]["members"][0]["access"], "public");
    }

    #[test]
    fn function_with_default_argument_values() {
        let source = "FUNCTION()\nvoid DoThing(int count, float scale = 1.5f);\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        assert_eq!(value[0]["type"], "function");
        assert_eq!(value[0]["macro"], "FUNCTION");
        assert_eq!(value[0]["name"], "DoThing");
        assert_eq!(value[0]["arguments"][0]["name"], "count");
        assert_eq!(value[0]["arguments"][1]["name"], "scale");
        assert_eq!(value[0]["arguments"][1]["defaultValue"], 1.5);
    }

    #[test]
    fn namespace_nests_members_and_qualifies_scope() {
        let source = "namespace app\n{\nENUM()\nenum class Mode\n{\n  A\n};\n}\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        assert_eq!(value[0]["type"], "namespace");
        assert_eq!(value[0]["name"], "app");
        assert_eq!(value[0]["members"][0]["type"], "enum");
        assert_eq!(value[0]["members"][0]["name"], "Mode");
    }

    #[test]
    fn include_directive_is_emitted() {
        let source = "#include <vector>\n";
        let value = scan(source, &MacroConfig::default()).unwrap();
        assert_eq!(value[0]["type"], "include");
        assert_eq!(value[0]["file"], "vector");
    }

    #[test]
    fn define_directive_is_skipped_without_emission() {
        let source = "#define FOO 1\nENUM()\nenum class E { A };\n";
        let value = scan(source, &MacroConfig::default()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["type"], "enum");
    }

    #[test]
    fn custom_macro_is_recognized_when_configured() {
        let mut config = MacroConfig::default();
        config.custom_macros.push("SERIALIZABLE".to_string());
        let source = "SERIALIZABLE()\n";
        let value = scan(source, &config).unwrap();
        assert_eq!(value[0]["type"], "macro");
        assert_eq!(value[0]["name"], "SERIALIZABLE");
    }

    #[test]
    fn unrecognized_statement_is_skipped() {
        let source = "int x = 1;\nENUM()\nenum class E { A };\n";
        let value = scan(source, &MacroConfig::default()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["name"], "E");
    }

    #[test]
    fn class_template_arguments_are_captured() {
        let source = "CLASS()\ntemplate<typename T>\nclass Box\n{\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();
        assert_eq!(value[0]["template"]["arguments"][0]["name"], "T");
    }

    #[test]
    fn missing_required_symbol_is_reported() {
        let source = "CLASS()\nclass Broken\n";
        let err = scan(source, &MacroConfig::default()).unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::RequiredSymbolMissing);
    }

    #[test]
    fn class_with_base_list_captures_parents() {
        let source = "CLASS()\nclass Derived : public Base, Hidden\n{\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        assert_eq!(value[0]["name"], "Derived");
        let parents = value[0]["parents"].as_array().unwrap();
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0]["access"], "public");
        assert_eq!(parents[0]["name"]["name"], "Base");
        // No access specifier given: defaults to private, matching the original's
        // unconditional default for an unlabelled base, even here where the derived type
        // is a `class`.
        assert_eq!(parents[1]["access"], "private");
        assert_eq!(parents[1]["name"]["name"], "Hidden");
    }

    #[test]
    fn function_argument_is_templated_and_virtual_with_default() {
        let source = "CLASS()\nclass Widget\n{\npublic:\nFUNCTION()\nvirtual void Configure(Map<String, Vec<int>> options) const = 0;\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        let function = &value[0]["members"][0];
        assert_eq!(function["type"], "function");
        assert_eq!(function["virtual"], true);
        assert_eq!(function["const"], true);
        assert_eq!(function["abstract"], true);

        let argument_type = &function["arguments"][0]["type"];
        assert_eq!(argument_type["type"], "template");
        assert_eq!(argument_type["name"], "Map");
        assert_eq!(argument_type["arguments"][0]["name"], "String");
        let inner = &argument_type["arguments"][1];
        assert_eq!(inner["type"], "template");
        assert_eq!(inner["name"], "Vec");
        assert_eq!(inner["arguments"][0]["name"], "int");
    }

    #[test]
    fn nested_template_property_type_splits_closing_shift() {
        let source = "CLASS()\nclass Widget\n{\npublic:\nPROPERTY()\nMap<String, Vec<int>> m;\n};\n";
        let value = scan(source, &MacroConfig::default()).unwrap();

        let property = &value[0]["members"][0];
        assert_eq!(property["type"], "property");
        assert_eq!(property["name"], "m");
        let data_type = &property["dataType"];
        assert_eq!(data_type["type"], "template");
        assert_eq!(data_type["name"], "Map");
        let inner = &data_type["arguments"][1];
        assert_eq!(inner["type"], "template");
        assert_eq!(inner["name"], "Vec");
        assert_eq!(inner["arguments"][0]["name"], "int");
    }
}
