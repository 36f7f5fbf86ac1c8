//! ABI layer for `<math.h>`.

trap_fn! {
    /// C `fabs`.
    fn fabs(x: f64) -> f64 => Fabs;
}
