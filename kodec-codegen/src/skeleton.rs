//! Reference emitter producing lexer/writer based codecs.

use eyre::Result;
use kodec_core::{go_string_literal, json_string_literal};
use kodec_ir::{Primitive, TypeId, TypeKind};

use crate::{
    CodeBuilder, EmitContext, EmitError, Emitter,
    imports::{LEXER_MODULE, WRITER_MODULE},
};

/// Prefix of generated decode helpers.
pub const DECODE_PREFIX: &str = "kodec_decode_";
/// Prefix of generated encode helpers.
pub const ENCODE_PREFIX: &str = "kodec_encode_";

/// Emits streaming codecs on top of the `jlexer` / `jwriter` runtime.
///
/// Every record gets a decode and an encode helper; record types reached
/// through fields (directly, behind pointers, in lists or as map values) are
/// requested from the generator and called by name. Top-level types also get
/// `MarshalJSON` / `UnmarshalJSON` methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkeletonEmitter;

impl SkeletonEmitter {
    pub fn new() -> Self {
        Self
    }

    fn ensure_record(ctx: &EmitContext<'_>, id: TypeId) -> Result<(), EmitError> {
        if ctx.def(id).is_record() {
            Ok(())
        } else {
            Err(EmitError::NotARecord {
                ty: ctx.graph().display(id).to_string(),
            })
        }
    }

    fn ensure_entry_point(ctx: &EmitContext<'_>, id: TypeId) -> Result<(), EmitError> {
        Self::ensure_record(ctx, id)?;
        let def = ctx.def(id);
        if def.name.is_none() {
            return Err(EmitError::AnonymousEntryPoint {
                ty: ctx.graph().display(id).to_string(),
            });
        }
        if !def.module.is_empty() && def.module != ctx.package().path {
            return Err(EmitError::ForeignEntryPoint {
                ty: ctx.graph().display(id).to_string(),
                module: def.module.clone(),
            });
        }
        Ok(())
    }

    fn decode_value(
        ctx: &mut EmitContext<'_>,
        ty: TypeId,
        target: &str,
        b: CodeBuilder,
    ) -> Result<CodeBuilder, EmitError> {
        let def = ctx.def(ty);
        match &def.kind {
            TypeKind::Primitive(p) => Ok(b.line(&format!(
                "{} = {}(in.{}())",
                target,
                p.as_str(),
                p.method_name()
            ))),
            TypeKind::Record(_) => {
                ctx.request_type(ty);
                let func = ctx.function_name(DECODE_PREFIX, ty);
                Ok(b.line(&format!("{}(in, &{})", func, target)))
            }
            TypeKind::Pointer(elem) => {
                let elem = *elem;
                let elem_ty = ctx.type_ref(elem)?;
                let b = b
                    .block_with_close("if in.IsNull() {", "} else {", |b| {
                        b.line("in.Skip()").line(&format!("{} = nil", target))
                    })
                    .indent()
                    .line(&format!("if {} == nil {{", target))
                    .indent()
                    .line(&format!("{} = new({})", target, elem_ty))
                    .dedent()
                    .line("}");
                let b = Self::decode_value(ctx, elem, &format!("(*{})", target), b)?;
                Ok(b.dedent().line("}"))
            }
            TypeKind::List(elem) => {
                let elem = *elem;
                let elem_ty = ctx.type_ref(elem)?;
                let item = ctx.unique_var_name();
                let b = b
                    .block_with_close("if in.IsNull() {", "} else {", |b| {
                        b.line("in.Skip()").line(&format!("{} = nil", target))
                    })
                    .indent()
                    .line("in.Delim('[')")
                    .line(&format!("{} = {}[:0]", target, target));
                let b = b.try_block("for !in.IsDelim(']') {", "}", |b| {
                    let b = b.line(&format!("var {} {}", item, elem_ty));
                    let b = Self::decode_value(ctx, elem, &item, b)?;
                    Ok::<_, EmitError>(
                        b.line(&format!("{} = append({}, {})", target, target, item))
                            .line("in.WantComma()"),
                    )
                })?;
                Ok(b.line("in.Delim(']')").dedent().line("}"))
            }
            TypeKind::Map(key, value) => {
                let (key, value) = (*key, *value);
                Self::ensure_string_key(ctx, ty, key)?;
                let map_ty = ctx.type_ref(ty)?;
                let value_ty = ctx.type_ref(value)?;
                let k = ctx.unique_var_name();
                let v = ctx.unique_var_name();
                let b = b
                    .block_with_close("if in.IsNull() {", "} else {", |b| {
                        b.line("in.Skip()").line(&format!("{} = nil", target))
                    })
                    .indent()
                    .line("in.Delim('{')")
                    .line(&format!("{} = make({})", target, map_ty));
                let b = b.try_block("for !in.IsDelim('}') {", "}", |b| {
                    let b = b
                        .line(&format!("{} := string(in.String())", k))
                        .line("in.WantColon()")
                        .line(&format!("var {} {}", v, value_ty));
                    let b = Self::decode_value(ctx, value, &v, b)?;
                    Ok::<_, EmitError>(
                        b.line(&format!("({})[{}] = {}", target, k, v))
                            .line("in.WantComma()"),
                    )
                })?;
                Ok(b.line("in.Delim('}')").dedent().line("}"))
            }
        }
    }

    fn encode_value(
        ctx: &mut EmitContext<'_>,
        ty: TypeId,
        src: &str,
        b: CodeBuilder,
    ) -> Result<CodeBuilder, EmitError> {
        let def = ctx.def(ty);
        match &def.kind {
            TypeKind::Primitive(p) => Ok(b.line(&format!(
                "out.{}({}({}))",
                p.method_name(),
                p.as_str(),
                src
            ))),
            TypeKind::Record(_) => {
                ctx.request_type(ty);
                let func = ctx.function_name(ENCODE_PREFIX, ty);
                Ok(b.line(&format!("{}(out, {})", func, src)))
            }
            TypeKind::Pointer(elem) => {
                let elem = *elem;
                let b = b
                    .block_with_close(&format!("if {} == nil {{", src), "} else {", |b| {
                        b.line("out.RawString(\"null\")")
                    })
                    .indent();
                let b = Self::encode_value(ctx, elem, &format!("(*{})", src), b)?;
                Ok(b.dedent().line("}"))
            }
            TypeKind::List(elem) => {
                let elem = *elem;
                let index = ctx.unique_var_name();
                let item = ctx.unique_var_name();
                let b = b
                    .block_with_close(&format!("if {} == nil {{", src), "} else {", |b| {
                        b.line("out.RawString(\"null\")")
                    })
                    .indent()
                    .line("out.RawByte('[')");
                let b = b.try_block(
                    &format!("for {}, {} := range {} {{", index, item, src),
                    "}",
                    |b| {
                        let b = b.block_with_close(&format!("if {} > 0 {{", index), "}", |b| {
                            b.line("out.RawByte(',')")
                        });
                        Self::encode_value(ctx, elem, &item, b)
                    },
                )?;
                Ok(b.line("out.RawByte(']')").dedent().line("}"))
            }
            TypeKind::Map(key, value) => {
                let (key, value) = (*key, *value);
                Self::ensure_string_key(ctx, ty, key)?;
                let first = format!("{}First", ctx.unique_var_name());
                let k = ctx.unique_var_name();
                let v = ctx.unique_var_name();
                let b = b
                    .block_with_close(&format!("if {} == nil {{", src), "} else {", |b| {
                        b.line("out.RawString(\"null\")")
                    })
                    .indent()
                    .line("out.RawByte('{')")
                    .line(&format!("{} := true", first));
                let b = b.try_block(&format!("for {}, {} := range {} {{", k, v, src), "}", |b| {
                    let b = b
                        .block_with_close(&format!("if !{} {{", first), "}", |b| {
                            b.line("out.RawByte(',')")
                        })
                        .line(&format!("{} = false", first))
                        .line(&format!("out.String(string({}))", k))
                        .line("out.RawByte(':')");
                    Self::encode_value(ctx, value, &v, b)
                })?;
                Ok(b.line("out.RawByte('}')").dedent().line("}"))
            }
        }
    }

    fn ensure_string_key(ctx: &EmitContext<'_>, map: TypeId, key: TypeId) -> Result<(), EmitError> {
        match ctx.def(key).kind {
            TypeKind::Primitive(Primitive::String) => Ok(()),
            _ => Err(EmitError::UnsupportedType {
                ty: ctx.graph().display(map).to_string(),
                reason: "map keys must be strings".to_string(),
            }),
        }
    }

    /// Emptiness check guarding an omitted field, if the type has one.
    fn empty_check(ctx: &EmitContext<'_>, ty: TypeId, src: &str) -> Option<String> {
        match &ctx.def(ty).kind {
            TypeKind::Primitive(p) => Some(format!("{} != {}", src, p.zero_literal())),
            TypeKind::Pointer(_) => Some(format!("{} != nil", src)),
            TypeKind::List(_) | TypeKind::Map(..) => Some(format!("len({}) != 0", src)),
            TypeKind::Record(_) => None,
        }
    }
}

impl Emitter for SkeletonEmitter {
    fn emit_decoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        Self::ensure_record(ctx, id)?;
        let func = ctx.function_name(DECODE_PREFIX, id);
        let lexer = ctx.alias_for(LEXER_MODULE);
        let ty = ctx.type_ref(id)?;
        let fields = ctx.def(id).fields();

        let b = CodeBuilder::new().try_block(
            &format!("func {}(in *{}.Lexer, out *{}) {{", func, lexer, ty),
            "}",
            |b| {
                let b = b
                    .block_with_close("if in.IsNull() {", "}", |b| {
                        b.line("in.Skip()").line("return")
                    })
                    .line("in.Delim('{')");
                let b = b.try_block("for !in.IsDelim('}') {", "}", |b| {
                    let b = b
                        .line("key := in.UnsafeFieldName(false)")
                        .line("in.WantColon()")
                        .block_with_close("if in.IsNull() {", "}", |b| {
                            b.line("in.Skip()").line("in.WantComma()").line("continue")
                        })
                        .line("switch key {");
                    let mut b = b;
                    for field in fields {
                        let key = ctx.field_name(id, field);
                        b = b.line(&format!("case {}:", go_string_literal(&key))).indent();
                        b = Self::decode_value(ctx, field.ty, &format!("out.{}", field.name), b)?
                            .dedent();
                    }
                    Ok::<_, EmitError>(
                        b.line("default:")
                            .indent()
                            .line("in.SkipRecursive()")
                            .dedent()
                            .line("}")
                            .line("in.WantComma()"),
                    )
                })?;
                Ok::<_, EmitError>(b.line("in.Delim('}')"))
            },
        )?;

        ctx.write(&b.blank().build());
        Ok(())
    }

    fn emit_encoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        Self::ensure_record(ctx, id)?;
        let func = ctx.function_name(ENCODE_PREFIX, id);
        let writer = ctx.alias_for(WRITER_MODULE);
        let ty = ctx.type_ref(id)?;
        let fields = ctx.def(id).fields();
        let omit_all = ctx.omit_empty();

        let b = CodeBuilder::new().try_block(
            &format!("func {}(out *{}.Writer, in {}) {{", func, writer, ty),
            "}",
            |b| {
                let mut b = b.line("out.RawByte('{')").line("first := true").line("_ = first");
                for field in fields {
                    let key = ctx.field_name(id, field);
                    let key_literal =
                        go_string_literal(&format!("{}:", json_string_literal(&key)));
                    let src = format!("in.{}", field.name);
                    let guard = if omit_all || field.has_tag_option("omitempty") {
                        Self::empty_check(ctx, field.ty, &src)
                    } else {
                        None
                    };

                    if let Some(cond) = &guard {
                        b = b.line(&format!("if {} {{", cond)).indent();
                    }
                    b = b
                        .block_with_close("if !first {", "}", |b| b.line("out.RawByte(',')"))
                        .line("first = false")
                        .line(&format!("out.RawString({})", key_literal));
                    b = Self::encode_value(ctx, field.ty, &src, b)?;
                    if guard.is_some() {
                        b = b.dedent().line("}");
                    }
                }
                Ok::<_, EmitError>(b.line("out.RawByte('}')"))
            },
        )?;

        ctx.write(&b.blank().build());
        Ok(())
    }

    fn emit_marshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        Self::ensure_entry_point(ctx, id)?;
        let func = ctx.function_name(ENCODE_PREFIX, id);
        let writer = ctx.alias_for(WRITER_MODULE);
        let ty = ctx.type_ref(id)?;

        let code = CodeBuilder::new()
            .comment("MarshalJSON supports json.Marshaler interface")
            .block_with_close(
                &format!("func (v {}) MarshalJSON() ([]byte, error) {{", ty),
                "}",
                |b| {
                    b.line(&format!("w := {}.Writer{{}}", writer))
                        .line(&format!("{}(&w, v)", func))
                        .line("return w.Buffer.BuildBytes(), w.Error")
                },
            )
            .blank()
            .build();

        ctx.write(&code);
        Ok(())
    }

    fn emit_unmarshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        Self::ensure_entry_point(ctx, id)?;
        let func = ctx.function_name(DECODE_PREFIX, id);
        let lexer = ctx.alias_for(LEXER_MODULE);
        let ty = ctx.type_ref(id)?;

        let code = CodeBuilder::new()
            .comment("UnmarshalJSON supports json.Unmarshaler interface")
            .block_with_close(
                &format!("func (v *{}) UnmarshalJSON(data []byte) error {{", ty),
                "}",
                |b| {
                    b.line(&format!("r := {}.Lexer{{Data: data}}", lexer))
                        .line(&format!("{}(&r, v)", func))
                        .line("return r.Error()")
                },
            )
            .blank()
            .build();

        ctx.write(&code);
        Ok(())
    }
}
