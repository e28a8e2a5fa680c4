/// Core trait for every per-sample effect unit.
///
/// An effect is a function of (input sample, its own filter memory,
/// a parameter snapshot). The snapshot is taken by the caller once per tick,
/// so `process` never observes a parameter change halfway through a sample.
pub trait Effect {
    /// Parameter set read by [`process`](Effect::process).
    type Params;

    /// Process one sample. Disabled effects return `input` unchanged.
    fn process(&mut self, input: f32, params: &Self::Params) -> f32;

    /// Clear all internal state (filter memory, envelope, delay contents).
    fn reset(&mut self);
}
