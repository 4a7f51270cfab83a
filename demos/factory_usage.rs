use dynamic_graph_exceptions::{
    DynamicGraphError, Exception, FactoryErrorCode, Result, SignalError, SignalErrorCode,
    TraceBuffer, exception, factory_err, logging,
};
use std::collections::HashMap;
use std::sync::Arc;

struct Registry {
    entities: HashMap<String, usize>,
}

impl Registry {
    fn create(&mut self, name: &str, dim: usize) -> Result<()> {
        if self.entities.contains_key(name) {
            return Err(factory_err!(
                FactoryErrorCode::ObjectConflict,
                "Another entity already defined with the same name. ",
                "Entity name is <{}>.",
                name
            )
            .into());
        }
        self.entities.insert(name.to_string(), dim);
        Ok(())
    }

    fn plug(&self, name: &str, expected: usize) -> Result<()> {
        let dim = *self.entities.get(name).ok_or_else(|| {
            DynamicGraphError::from(factory_err!(
                FactoryErrorCode::UnreferedObject,
                "Unknown entity: ",
                "<{}>",
                name
            ))
        })?;

        if dim != expected {
            return Err(exception!(
                SignalError,
                SignalErrorCode::PlugImpossible,
                "state signal size is ",
                "{}, should be {}.",
                dim,
                expected
            )
            .into());
        }
        Ok(())
    }
}

fn main() {
    println!("--- Factory Exception Example ---\n");

    let traces = TraceBuffer::new(32, 256);
    let mut registry = Registry {
        entities: HashMap::new(),
    };

    let failures: Vec<DynamicGraphError> = logging::with_sink(Arc::new(traces.clone()), || {
        [
            registry.create("device", 6),
            registry.create("device", 6),
            registry.plug("controller", 6),
            registry.plug("device", 1),
        ]
        .into_iter()
        .filter_map(|r| r.err())
        .collect()
    });

    println!("1. Exceptions raised:");
    for err in &failures {
        println!(
            "   {:<8} #{:<4} {}  ({}:{})",
            err.exception_name(),
            err.code_value(),
            err.message(),
            err.location().file(),
            err.location().line()
        );
    }

    println!("\n2. Captured traces (oldest first):");
    let mut entries = traces.get_all();
    entries.reverse();
    for entry in entries {
        println!("   [{:>2}] {}", entry.level, entry.text);
    }

    println!("\n3. Same traces with verbosity 1 (summaries only):");
    traces.clear();
    logging::set_verbosity(logging::TRACE_SUMMARY);
    logging::with_sink(Arc::new(traces.clone()), || {
        let _ = registry.plug("gripper", 1);
    });
    logging::reset_verbosity();
    for entry in traces.get_all() {
        println!("   [{:>2}] {}", entry.level, entry.text);
    }
}
