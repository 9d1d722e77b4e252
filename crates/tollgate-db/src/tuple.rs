//! actor-set filters.
//!
//! an actor set becomes one disjunctive predicate, either as an OR-chain of
//! `actor_type = ? AND actor_id IN (...)` terms or as a single row-value
//! comparison `(actor_type, actor_id) IN ((?, ?), ...)`.
//!
//! column names only ever come from sea-orm column enums, so they are fixed
//! at compile time. values are always bound parameters.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, Value};
use tollgate_types::{ActorFilter, ActorSet};

use crate::{Error, Result};

/// build the predicate selecting rows held by any member of `actors`.
///
/// an empty set selects nothing.
pub fn actor_condition<C: ColumnTrait>(
    strategy: ActorFilter,
    actor_type: C,
    actor_id: C,
    actors: &ActorSet,
) -> Result<Condition> {
    if actors.is_empty() {
        return Ok(matches_nothing());
    }

    match strategy {
        ActorFilter::OrChain => Ok(or_chain(actor_type, actor_id, actors)),
        ActorFilter::RowValues => {
            let tuples: Vec<Vec<Value>> = actors
                .iter()
                .map(|actor| {
                    vec![
                        Value::from(actor.actor_type.clone()),
                        Value::from(actor.id),
                    ]
                })
                .collect();
            where_tuple_in(&[actor_type, actor_id], &tuples)
        }
    }
}

/// `(type = t1 AND id IN (...)) OR (type = t2 AND id IN (...)) ...`
///
/// one term per actor type, so the predicate grows with the number of
/// distinct types rather than the number of actors.
pub fn or_chain<C: ColumnTrait>(actor_type: C, actor_id: C, actors: &ActorSet) -> Condition {
    if actors.is_empty() {
        return matches_nothing();
    }

    actors
        .by_type()
        .into_iter()
        .fold(Condition::any(), |cond, (type_name, ids)| {
            cond.add(
                Condition::all()
                    .add(actor_type.eq(type_name))
                    .add(actor_id.is_in(ids)),
            )
        })
}

/// `(c1, c2, ...) IN ((v, v, ...), ...)`
///
/// every tuple must be as wide as `columns`. zero columns selects every row;
/// zero tuples selects none.
pub fn where_tuple_in<C: ColumnTrait>(columns: &[C], tuples: &[Vec<Value>]) -> Result<Condition> {
    let width = columns.len();
    if let Some(tuple) = tuples.iter().find(|t| t.len() != width) {
        return Err(Error::TupleShape {
            columns: width,
            width: tuple.len(),
        });
    }

    if width == 0 {
        return Ok(Condition::all());
    }
    if tuples.is_empty() {
        return Ok(matches_nothing());
    }

    let column_list = columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = format!("({})", vec!["?"; width].join(", "));
    let rows = vec![placeholders; tuples.len()].join(", ");
    let values: Vec<Value> = tuples.iter().flatten().cloned().collect();

    Ok(Condition::all().add(Expr::cust_with_values(
        format!("({column_list}) IN ({rows})"),
        values,
    )))
}

/// a predicate no row satisfies.
pub fn matches_nothing() -> Condition {
    Condition::all().add(Expr::cust("1 = 0"))
}
