use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::error::BindError;
use crate::query::Variables;
use crate::routes::{RouteDescriptor, TypeSignature};

/// Bind path captures and query-string pairs to a route's variables.
///
/// List parameters become JSON arrays, one element per occurrence; any other
/// parameter may appear once. Values are coerced to the parameter's declared
/// scalar type.
pub fn bind_query(
    route: &RouteDescriptor,
    path_params: &[(String, String)],
    query: &[(String, String)],
) -> Result<Variables, BindError> {
    let mut variables = bind_path(route, path_params)?;

    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in query {
        grouped.entry(key.as_str()).or_default().push(value.as_str());
    }

    for (name, values) in grouped {
        let sig = route
            .query_params
            .get(name)
            .ok_or_else(|| BindError::UnknownParameter(name.to_string()))?;
        if values.len() > 1 && !sig.list {
            return Err(BindError::RepeatedParameter(name.to_string()));
        }
        let mut coerced = values
            .iter()
            .map(|raw| coerce(name, sig, raw))
            .collect::<Result<Vec<_>, _>>()?;
        let value = if sig.list {
            Value::Array(coerced)
        } else {
            coerced.remove(0)
        };
        variables.insert(route.variable_for(name), value);
    }

    check_required(route, &variables)?;
    Ok(variables)
}

/// Bind path captures and a JSON object body to a route's variables.
///
/// Flattened parameters may be sent either dotted (`"filter.name"`) or as a
/// nested object (`"filter": {"name": …}`).
pub fn bind_body(
    route: &RouteDescriptor,
    path_params: &[(String, String)],
    body: Value,
) -> Result<Variables, BindError> {
    let Value::Object(body) = body else {
        return Err(BindError::BodyNotObject);
    };

    let mut variables = bind_path(route, path_params)?;
    for (key, value) in body {
        if route.query_params.contains_key(&key) {
            variables.insert(route.variable_for(&key), value);
            continue;
        }
        match value {
            Value::Object(fields) if is_flattened_input(route, &key) => {
                for (field, value) in fields {
                    let name = format!("{}.{}", key, field);
                    if !route.query_params.contains_key(&name) {
                        return Err(BindError::UnknownParameter(name));
                    }
                    variables.insert(route.variable_for(&name), value);
                }
            }
            _ => return Err(BindError::UnknownParameter(key)),
        }
    }

    check_required(route, &variables)?;
    Ok(variables)
}

fn bind_path(
    route: &RouteDescriptor,
    path_params: &[(String, String)],
) -> Result<Variables, BindError> {
    let mut variables = Variables::new();
    for param in route.path_params() {
        let (_, value) = path_params
            .iter()
            .find(|(name, _)| *name == param.segment)
            .ok_or_else(|| BindError::MissingParameter(param.segment.clone()))?;
        variables.insert(param.variable, Value::String(value.clone()));
    }
    Ok(variables)
}

fn is_flattened_input(route: &RouteDescriptor, name: &str) -> bool {
    let prefix = format!("{}.", name);
    route.query_params.keys().any(|k| k.starts_with(&prefix))
}

fn check_required(route: &RouteDescriptor, variables: &Variables) -> Result<(), BindError> {
    for (name, sig) in &route.query_params {
        if sig.required && !variables.contains_key(&route.variable_for(name)) {
            return Err(BindError::MissingParameter(name.clone()));
        }
    }
    Ok(())
}

fn coerce(name: &str, sig: &TypeSignature, raw: &str) -> Result<Value, BindError> {
    let invalid = || BindError::InvalidValue {
        name: name.to_string(),
        expected: sig.type_name.clone(),
        value: raw.to_string(),
    };

    match sig.type_name.as_str() {
        "Int" => raw.parse::<i64>().map(Value::from).map_err(|_| invalid()),
        "Float" => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        "Boolean" => raw.parse::<bool>().map(Value::Bool).map_err(|_| invalid()),
        _ => Ok(Value::String(raw.to_string())),
    }
}
