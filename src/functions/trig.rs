use crate::functions::FunctionTable;

pub fn register(table: &mut FunctionTable) {
    table.register_function("sin", f64::sin);
    table.register_function("cos", f64::cos);
    table.register_function("tan", f64::tan);
    table.register_function("ctg", ctg);
    table.register_function("sec", sec);
    table.register_function("cosec", cosec);
}

/// Cotangent, `1 / tan(x)`.
pub fn ctg(x: f64) -> f64 {
    1.0 / x.tan()
}

/// Secant, `1 / cos(x)`.
pub fn sec(x: f64) -> f64 {
    1.0 / x.cos()
}

/// Cosecant, `1 / sin(x)`.
pub fn cosec(x: f64) -> f64 {
    1.0 / x.sin()
}
