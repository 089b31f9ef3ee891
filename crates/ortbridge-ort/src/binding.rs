use std::collections::HashMap;

use ortbridge_core::{Error, Result, TensorValue};

/// Named-slot binding of input and output values for one session invocation.
///
/// Outputs may be bound to a concrete value or to `None`, the explicit
/// unbound marker; unbound slots are filled by the engine on the next run.
/// [`outputs`](Self::outputs) is a borrowed view of the slot table — any
/// subsequent mutating call invalidates it, which the borrow checker
/// enforces at compile time.
#[derive(Default)]
pub struct Binding {
    inputs: Vec<(String, TensorValue)>,
    outputs: Vec<(String, Option<TensorValue>)>,
}

impl Binding {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attach a named input value. Rebinding a name replaces the value.
    pub fn bind_input(&mut self, name: impl Into<String>, value: TensorValue) {
        let name = name.into();
        if let Some(slot) = self.inputs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.inputs.push((name, value));
        }
    }

    /// Attach a named output slot. `None` is the explicit unbound marker for
    /// outputs with no value available yet.
    pub fn bind_output(&mut self, name: impl Into<String>, value: Option<TensorValue>) {
        let name = name.into();
        if let Some(slot) = self.outputs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.outputs.push((name, value));
        }
    }

    /// Currently bound output names, in bind order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Current output value slots. Unbound slots that have not been run yet
    /// hold `None`.
    pub fn outputs(&self) -> &[(String, Option<TensorValue>)] {
        &self.outputs
    }

    pub(crate) fn bound_inputs(&self) -> &[(String, TensorValue)] {
        &self.inputs
    }

    /// Overwrite each bound slot with the value the engine produced for it.
    pub(crate) fn fill_outputs(
        &mut self,
        mut produced: HashMap<&str, TensorValue>,
    ) -> Result<()> {
        for (name, slot) in &mut self.outputs {
            match produced.remove(name.as_str()) {
                Some(value) => *slot = Some(value),
                None => {
                    return Err(Error::UnknownSlot { name: name.clone() });
                }
            }
        }
        Ok(())
    }
}
