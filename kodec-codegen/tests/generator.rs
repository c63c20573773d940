//! Traversal and naming behavior of a full generation run.

use std::collections::HashMap;

use eyre::Result;
use kodec_codegen::{EmitContext, Emitter, Generator};
use kodec_ir::{Field, Primitive, TypeGraph, TypeId, TypeKind};

const MODELS: &str = "example.com/app/models";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Call {
    Decoder,
    Encoder,
    Marshaller,
    Unmarshaller,
}

/// Records every callback and discovers record types behind fields, the way
/// a real emitter does while writing a codec.
#[derive(Default)]
struct RecordingEmitter {
    calls: Vec<(Call, TypeId)>,
    fail_on: Option<(Call, TypeId)>,
}

#[derive(Debug, thiserror::Error)]
#[error("refusing to emit {0}")]
struct Refused(TypeId);

impl RecordingEmitter {
    fn record(&mut self, ctx: &mut EmitContext<'_>, call: Call, id: TypeId) -> Result<()> {
        if self.fail_on == Some((call, id)) {
            return Err(Refused(id).into());
        }
        self.calls.push((call, id));
        let name = ctx.function_name(&format!("{:?}_", call), id);
        ctx.write(&format!("{}\n", name));
        Ok(())
    }

    fn discover(ctx: &mut EmitContext<'_>, id: TypeId) {
        let mut stack = vec![id];
        let mut visited = Vec::new();
        while let Some(ty) = stack.pop() {
            if visited.contains(&ty) {
                continue;
            }
            visited.push(ty);
            match &ctx.def(ty).kind {
                TypeKind::Record(fields) if ty == id => {
                    stack.extend(fields.iter().map(|f| f.ty));
                }
                TypeKind::Record(_) => ctx.request_type(ty),
                TypeKind::List(elem) | TypeKind::Pointer(elem) => stack.push(*elem),
                TypeKind::Map(key, value) => stack.extend([*key, *value]),
                TypeKind::Primitive(_) => {}
            }
        }
    }
}

impl Emitter for RecordingEmitter {
    fn emit_decoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        Self::discover(ctx, id);
        self.record(ctx, Call::Decoder, id)
    }

    fn emit_encoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        self.record(ctx, Call::Encoder, id)
    }

    fn emit_marshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        self.record(ctx, Call::Marshaller, id)
    }

    fn emit_unmarshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        self.record(ctx, Call::Unmarshaller, id)
    }
}

/// Run a generator over `graph` and return the output plus recorded calls.
fn run(
    graph: &TypeGraph,
    top_level: &[TypeId],
    nested: &[TypeId],
) -> (String, Vec<(Call, TypeId)>) {
    let mut emitter = RecordingEmitter::default();
    let out = {
        let mut generator = Generator::new(graph, &mut emitter);
        generator.set_package("models", MODELS);
        for id in nested {
            generator.request_type(*id);
        }
        for id in top_level {
            generator.request_top_level(*id);
        }
        generator.run().expect("generation should succeed")
    };
    (out, emitter.calls)
}

fn count(calls: &[(Call, TypeId)]) -> HashMap<(Call, TypeId), usize> {
    let mut counts = HashMap::new();
    for call in calls {
        *counts.entry(*call).or_insert(0) += 1;
    }
    counts
}

/// A -> B -> C, A -> D, C -> A (cycle), E unreachable.
fn chain_graph() -> (TypeGraph, [TypeId; 5]) {
    let mut graph = TypeGraph::new();
    let string = graph.primitive(Primitive::String);
    let a = graph.declare_record(MODELS, "A");
    let b = graph.declare_record(MODELS, "B");
    let c = graph.declare_record(MODELS, "C");
    let d = graph.declare_record(MODELS, "D");
    let e = graph.declare_record(MODELS, "E");

    let b_ptr = graph.pointer(b);
    let d_list = graph.list(d);
    let a_map = graph.map(string, a);
    graph.set_fields(a, vec![Field::new("B", b_ptr), Field::new("Ds", d_list)]);
    graph.set_fields(b, vec![Field::new("C", c), Field::new("Name", string)]);
    graph.set_fields(c, vec![Field::new("Parents", a_map)]);
    graph.set_fields(d, vec![Field::new("Label", string)]);
    graph.set_fields(e, vec![Field::new("Label", string)]);

    (graph, [a, b, c, d, e])
}

#[test]
fn test_every_reachable_type_visited_once() {
    let (graph, [a, b, c, d, e]) = chain_graph();
    let (_, calls) = run(&graph, &[a], &[]);
    let counts = count(&calls);

    for ty in [a, b, c, d] {
        assert_eq!(counts.get(&(Call::Decoder, ty)), Some(&1));
        assert_eq!(counts.get(&(Call::Encoder, ty)), Some(&1));
    }
    assert_eq!(counts.get(&(Call::Decoder, e)), None);
}

#[test]
fn test_registration_order_does_not_change_visited_set() {
    let (graph, [a, b, c, d, _]) = chain_graph();
    let orders: [&[TypeId]; 4] = [&[a, b], &[b, a], &[d, c, b, a], &[c, c, a]];

    let mut visited_sets = Vec::new();
    for order in orders {
        let (_, calls) = run(&graph, order, &[]);
        let mut decoded: Vec<TypeId> = calls
            .iter()
            .filter(|(call, _)| *call == Call::Decoder)
            .map(|(_, ty)| *ty)
            .collect();
        let total = decoded.len();
        decoded.sort();
        decoded.dedup();
        assert_eq!(decoded.len(), total, "a type was decoded twice");
        visited_sets.push(decoded);
    }

    assert!(visited_sets.iter().all(|set| *set == visited_sets[0]));
    assert_eq!(visited_sets[0], vec![a, b, c, d]);
}

#[test]
fn test_nested_types_get_no_entry_points() {
    let (graph, [a, b, c, d, _]) = chain_graph();
    let (_, calls) = run(&graph, &[a], &[]);
    let counts = count(&calls);

    assert_eq!(counts.get(&(Call::Marshaller, a)), Some(&1));
    assert_eq!(counts.get(&(Call::Unmarshaller, a)), Some(&1));
    for ty in [b, c, d] {
        assert_eq!(counts.get(&(Call::Marshaller, ty)), None);
        assert_eq!(counts.get(&(Call::Unmarshaller, ty)), None);
    }
}

#[test]
fn test_request_type_alone_gets_no_entry_points() {
    let (graph, [_, _, _, d, _]) = chain_graph();
    let (_, calls) = run(&graph, &[], &[d]);

    assert_eq!(calls, vec![(Call::Decoder, d), (Call::Encoder, d)]);
}

#[test]
fn test_two_top_level_types_with_shared_field() {
    let mut graph = TypeGraph::new();
    let string = graph.primitive(Primitive::String);
    let b = graph.record(MODELS, "B", vec![Field::new("Name", string)]);
    let a = graph.record(MODELS, "A", vec![Field::new("B", b)]);

    for order in [[a, b], [b, a]] {
        let (out, calls) = run(&graph, &order, &[]);
        let counts = count(&calls);

        for ty in [a, b] {
            for call in [Call::Decoder, Call::Encoder, Call::Marshaller, Call::Unmarshaller] {
                assert_eq!(counts.get(&(call, ty)), Some(&1), "{:?} for {:?}", call, ty);
            }
        }
        assert!(out.contains("Marshaller_example_com_app_models_B\n"));
        assert!(out.contains("Unmarshaller_example_com_app_models_A\n"));
    }
}

#[test]
fn test_emission_order_is_last_in_first_out() {
    let mut graph = TypeGraph::new();
    let x = graph.record(MODELS, "X", Vec::new());
    let y = graph.record(MODELS, "Y", Vec::new());
    let (_, calls) = run(&graph, &[x, y], &[]);

    assert_eq!(
        calls,
        vec![
            (Call::Decoder, y),
            (Call::Encoder, y),
            (Call::Marshaller, y),
            (Call::Unmarshaller, y),
            (Call::Decoder, x),
            (Call::Encoder, x),
            (Call::Marshaller, x),
            (Call::Unmarshaller, x),
        ]
    );
}

#[test]
fn test_anonymous_records_get_distinct_symbols() {
    let mut graph = TypeGraph::new();
    let int = graph.primitive(Primitive::Int);
    let first = graph.anonymous_record(MODELS, vec![Field::new("X", int)]);
    let second = graph.anonymous_record(MODELS, vec![Field::new("Y", int)]);
    let holder = graph.record(
        MODELS,
        "Holder",
        vec![Field::new("First", first), Field::new("Second", second)],
    );

    let (out, _) = run(&graph, &[holder], &[]);
    let decoders: Vec<&str> = out
        .lines()
        .filter(|l| l.starts_with("Decoder_example_com_app_modelsanonymous"))
        .collect();

    assert_eq!(decoders.len(), 2);
    assert_ne!(decoders[0], decoders[1]);
}

#[test]
fn test_emitter_error_aborts_run_unwrapped() {
    let (graph, [a, b, _, _, _]) = chain_graph();
    let mut emitter = RecordingEmitter {
        fail_on: Some((Call::Encoder, b)),
        ..Default::default()
    };

    let result = {
        let mut generator = Generator::new(&graph, &mut emitter);
        generator.request_top_level(a);
        generator.run()
    };

    let err = result.expect_err("run should fail");
    let refused = err.downcast_ref::<Refused>().expect("error should be passed through");
    assert_eq!(refused.0, b);
    // Nothing after the failing call was emitted.
    assert_eq!(emitter.calls.last(), Some(&(Call::Decoder, b)));
}

#[test]
fn test_header_precedes_body() {
    let mut graph = TypeGraph::new();
    let x = graph.record(MODELS, "X", Vec::new());
    let (out, _) = run(&graph, &[x], &[]);

    let package = out.find("package models\n").unwrap();
    let marker = out.find("var _ = json.RawMessage{}").unwrap();
    let body = out.find("Decoder_example_com_app_models_X\n").unwrap();
    assert!(package < marker && marker < body);
}
