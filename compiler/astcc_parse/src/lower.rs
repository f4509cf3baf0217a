//! Lowering of parsed files into the schema model.
//!
//! Names are registered for every file before any node body is built, so a
//! node may use a type or node declared later, in the same or a later file.

use astcc_diagnostic::{Diagnostic, ErrorCode};
use astcc_ir::{
    AlreadyDeclared, AttrFlags, Attribute, Include, Method, MethodFlags, Node, NodeFlags,
    Parameter, Schema, Span, SymbolId,
};
use tracing::{debug, trace};

use crate::syntax::{AttrDecl, Feature, Flag, Ident, Item, MethodDecl, NodeDecl, SchemaFile};
use crate::token::FlagKeyword;

/// Result of lowering a set of parsed files.
#[derive(Clone, Debug)]
pub struct LowerOutput {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the schema from parsed files, in the order given.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn lower(files: &[SchemaFile]) -> LowerOutput {
    let mut lowerer = Lowerer::new();

    let mut declared = Vec::new();
    for file in files {
        for item in &file.items {
            if let Some(node) = lowerer.declare(item) {
                declared.push(node);
            }
        }
        if let Some(trailing) = &file.trailing {
            lowerer.schema.trailing_code.push_str(trailing);
        }
    }

    for (decl, name) in declared {
        lowerer.build_node(decl, name);
    }

    debug!(
        nodes = lowerer.schema.node_count(),
        symbols = lowerer.schema.symbols.len(),
        "lowered schema"
    );
    LowerOutput {
        schema: lowerer.schema,
        diagnostics: lowerer.diagnostics,
    }
}

struct Lowerer {
    schema: Schema,
    /// Declaration site of each symbol, indexed by `SymbolId`.
    symbol_spans: Vec<Span>,
    diagnostics: Vec<Diagnostic>,
}

impl Lowerer {
    fn new() -> Self {
        let schema = Schema::new();
        let symbol_spans = vec![Span::DUMMY; schema.symbols.len()];
        Lowerer {
            schema,
            symbol_spans,
            diagnostics: Vec::new(),
        }
    }

    /// Register the names an item declares. Returns node declarations for
    /// the second pass.
    fn declare<'f>(&mut self, item: &'f Item) -> Option<(&'f NodeDecl, SymbolId)> {
        match item {
            Item::Include { text, span } => {
                self.schema.includes.push(Include {
                    text: text.clone(),
                    span: *span,
                });
                None
            }
            Item::Type(name) => {
                let result = self.schema.symbols.add_type(&name.name);
                self.record_declaration(result, name);
                None
            }
            Item::Node(decl) => {
                let result = self.schema.symbols.add_node(&decl.name.name);
                self.record_declaration(result, &decl.name)
                    .map(|id| (decl, id))
            }
        }
    }

    fn record_declaration(
        &mut self,
        result: Result<SymbolId, AlreadyDeclared>,
        name: &Ident,
    ) -> Option<SymbolId> {
        match result {
            Ok(id) => {
                trace!(name = %name.name, "declared");
                self.symbol_spans.push(name.span);
                Some(id)
            }
            Err(err) => {
                let first = self
                    .symbol_spans
                    .get(err.id.index())
                    .copied()
                    .unwrap_or(Span::DUMMY);
                let mut diag = Diagnostic::error(ErrorCode::E2001)
                    .with_message(err.to_string())
                    .with_label(name.span, "declared again here")
                    .with_secondary_label(first, "first declared here");
                if first.is_dummy() {
                    diag = diag.with_note(format!("`{}` is built in", err.name));
                }
                self.diagnostics.push(diag);
                None
            }
        }
    }

    /// Look up a type or node name used in a declaration.
    fn resolve_type(&mut self, ty: &Ident) -> Option<SymbolId> {
        let found = self.schema.symbols.find(&ty.name);
        if found.is_none() {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!("undeclared type `{}`", ty.name))
                    .with_label(ty.span, "not declared with `%type` or `%node`")
                    .with_suggestion(format!("add `%type {}` to the schema", ty.name)),
            );
        }
        found
    }

    fn build_node(&mut self, decl: &NodeDecl, name: SymbolId) {
        let mut node = Node::new(name)
            .with_flags(node_flags(&decl.flags))
            .with_span(decl.name.span);
        if let Some(parent) = &decl.parent {
            node = node.with_parent(&parent.name);
        }

        let mut factory: Option<&Ident> = None;
        for feature in &decl.features {
            match feature {
                Feature::Attr(attr) => {
                    if let Some(attr) = self.lower_attr(attr) {
                        node.attributes.push(attr);
                    }
                }
                Feature::Method(method) => {
                    if let Some(method) = self.lower_method(method) {
                        node.methods.push(method);
                    }
                }
                Feature::Factory(ty) => {
                    if let Some(first) = factory {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E2003)
                                .with_message(format!(
                                    "node `{}` declares more than one factory type",
                                    decl.name.name
                                ))
                                .with_label(ty.span, "second `%factory`")
                                .with_secondary_label(first.span, "first `%factory`"),
                        );
                        continue;
                    }
                    factory = Some(ty);
                    node.factory_type = self.lower_factory(ty);
                }
            }
        }

        debug!(
            node = %decl.name.name,
            attributes = node.attributes.len(),
            methods = node.methods.len(),
            "built node"
        );
        self.schema.add_node(node);
    }

    fn lower_factory(&mut self, ty: &Ident) -> Option<SymbolId> {
        let id = self.resolve_type(ty)?;
        if self.schema.symbols.is_node(id) {
            Some(id)
        } else {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2004)
                    .with_message(format!("factory type `{}` is not a node", ty.name))
                    .with_label(ty.span, "declared with `%type`")
                    .with_note("a factory can only advertise a node type"),
            );
            None
        }
    }

    fn lower_attr(&mut self, decl: &AttrDecl) -> Option<Attribute> {
        let ty = self.resolve_type(&decl.ty)?;
        let mut attr = Attribute::new(&decl.name.name, ty)
            .with_flags(attr_flags(&decl.flags))
            .with_span(decl.name.span);
        attr.default_code.clone_from(&decl.default_code);
        Some(attr)
    }

    fn lower_method(&mut self, decl: &MethodDecl) -> Option<Method> {
        let return_type = self.resolve_type(&decl.return_type);

        let mut params: Vec<Parameter> = Vec::with_capacity(decl.params.len());
        let mut ok = return_type.is_some();
        for param in &decl.params {
            if let Some(previous) = params.iter().find(|p| p.name == param.name.name) {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E2005)
                        .with_message(format!(
                            "parameter `{}` of method `{}` is declared twice",
                            param.name.name, decl.name.name
                        ))
                        .with_label(param.name.span, "duplicate parameter")
                        .with_secondary_label(previous.span, "first declared here"),
                );
                ok = false;
                continue;
            }
            match self.resolve_type(&param.ty) {
                Some(ty) => params.push(Parameter {
                    name: param.name.name.clone(),
                    ty,
                    span: param.name.span,
                }),
                None => ok = false,
            }
        }

        let return_type = return_type.filter(|_| ok)?;
        let mut method = Method::new(&decl.name.name, return_type)
            .with_flags(method_flags(&decl.flags))
            .with_span(decl.name.span);
        method.params = params;
        method.code.clone_from(&decl.code);
        Some(method)
    }
}

fn node_flags(flags: &[Flag]) -> NodeFlags {
    flags.iter().fold(NodeFlags::empty(), |acc, flag| match flag.keyword {
        FlagKeyword::Abstract => acc | NodeFlags::ABSTRACT,
        _ => acc,
    })
}

fn attr_flags(flags: &[Flag]) -> AttrFlags {
    flags.iter().fold(AttrFlags::empty(), |acc, flag| {
        acc | match flag.keyword {
            FlagKeyword::Public => AttrFlags::PUBLIC,
            FlagKeyword::Protected => AttrFlags::PROTECTED,
            FlagKeyword::Private => AttrFlags::PRIVATE,
            FlagKeyword::Static => AttrFlags::STATIC,
            FlagKeyword::NoInlines => AttrFlags::NO_INLINES,
            FlagKeyword::NoInit => AttrFlags::NO_INIT,
            FlagKeyword::Abstract | FlagKeyword::External => AttrFlags::empty(),
        }
    })
}

fn method_flags(flags: &[Flag]) -> MethodFlags {
    flags.iter().fold(MethodFlags::empty(), |acc, flag| {
        acc | match flag.keyword {
            FlagKeyword::Public => MethodFlags::PUBLIC,
            FlagKeyword::Protected => MethodFlags::PROTECTED,
            FlagKeyword::Private => MethodFlags::PRIVATE,
            FlagKeyword::Static => MethodFlags::STATIC,
            FlagKeyword::Abstract => MethodFlags::ABSTRACT,
            FlagKeyword::External => MethodFlags::EXTERNAL,
            FlagKeyword::NoInlines | FlagKeyword::NoInit => MethodFlags::empty(),
        }
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
