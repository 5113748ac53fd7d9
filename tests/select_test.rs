mod common;

use pretty_assertions::assert_eq;
use querycraft::prelude::*;
use querycraft::translator::DefaultTranslator;
use std::sync::Arc;

use common::{TestClass, TestClass2, TestClass3};

fn query() -> Query {
    Query::from_table::<TestClass>(Arc::new(DefaultTranslator))
}

#[test]
fn test_select_no_where() {
    assert_eq!(query().to_sql().unwrap(), "SELECT * FROM TestClass WITH(NOLOCK)");
}

#[test]
fn test_select_where() {
    let t = TestClass::schema();
    assert_eq!(
        query().where_clause(t.col("Id").equals(0)).to_sql().unwrap(),
        "SELECT * FROM TestClass WITH(NOLOCK) WHERE (TestClass.Id = 0)"
    );
}

#[test]
fn test_select_with_top() {
    assert_eq!(
        query().top(10).to_sql().unwrap(),
        "SELECT TOP (10) * FROM TestClass WITH(NOLOCK)"
    );
}

#[test]
fn test_select_with_top_and_where() {
    let t = TestClass::schema();
    assert_eq!(
        query().where_clause(t.col("Id").equals(0)).top(10).to_sql().unwrap(),
        "SELECT TOP (10) * FROM TestClass WITH(NOLOCK) WHERE (TestClass.Id = 0)"
    );
}

#[test]
fn test_complex_query() {
    let t = TestClass::schema();
    let t2 = TestClass2::schema();
    let t3 = TestClass3::schema();

    let sql = query()
        .join(&t2, t.col("Id").equals(t2.col("Id")))
        .left_join(&t2, t.col("Id").equals(t2.col("Id")).and(t2.col("Id").equals(1)))
        .right_join_between(
            &t2,
            &t3,
            t2.col("Id").equals(t3.col("Id")).and(t3.col("Id").greater_than(1)),
        )
        .where_clause(t.col("Number").greater_than(105))
        .top(103)
        .to_sql()
        .unwrap();

    let expected = [
        "SELECT TOP (103) * FROM TestClass WITH(NOLOCK)",
        " INNER JOIN TestClass2 WITH(NOLOCK) ON (TestClass.Id = TestClass2.Id)",
        " LEFT JOIN TestClass2 WITH(NOLOCK) ON ((TestClass.Id = TestClass2.Id) AND (TestClass2.Id = 1))",
        " RIGHT JOIN TestClass3 WITH(NOLOCK) ON ((TestClass2.Id = TestClass3.Id) AND (TestClass3.Id > 1))",
        " WHERE (TestClass.Number > 105)",
    ]
    .concat();
    assert_eq!(sql, expected);
}

#[test]
fn test_select_columns() {
    let t = TestClass::schema();
    assert_eq!(
        query().select(fields([t.col("Id"), t.col("Name")])).to_sql().unwrap(),
        "SELECT TestClass.Id, TestClass.Name FROM TestClass WITH(NOLOCK)"
    );
}

#[test]
fn test_top_before_select_is_not_duplicated() {
    let t = TestClass::schema();
    assert_eq!(
        query()
            .top(10)
            .select(fields([t.col("Id"), t.col("Name")]))
            .top(10)
            .to_sql()
            .unwrap(),
        "SELECT TOP (10) TestClass.Id, TestClass.Name FROM TestClass WITH(NOLOCK)"
    );
}

#[test]
fn test_where_and_or_combine() {
    let t = TestClass::schema();
    let sql = query()
        .where_clause(t.col("Id").greater_than(1))
        .where_clause(t.col("Done"))
        .or_where(t.col("Name").is_null())
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM TestClass WITH(NOLOCK) WHERE (((TestClass.Id > 1)) AND ((TestClass.Done = 1))) OR ((TestClass.Name IS NULL))"
    );
}

#[test]
fn test_group_by_having_order_by() {
    let t = TestClass::schema();
    let sql = query()
        .count()
        .select(t.col("Number"))
        .group_by(t.col("Number"))
        .having(t.col("Number").greater_than(3))
        .order_by_descending(t.col("Number"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(*), TestClass.Number FROM TestClass WITH(NOLOCK) GROUP BY TestClass.Number HAVING (TestClass.Number > 3) ORDER BY TestClass.Number DESC"
    );
}

#[test]
fn test_paginate() {
    let t = TestClass::schema();
    let sql = query()
        .order_by(t.col("Id"))
        .paginate(25, 3)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM TestClass WITH(NOLOCK) ORDER BY TestClass.Id OFFSET 50 ROWS FETCH NEXT 25 ROWS ONLY"
    );
}

#[test]
fn test_union_order() {
    let t = TestClass::schema();
    let t2 = TestClass2::schema();
    let sql = query()
        .select(t.col("Id"))
        .union_all(Query::from_table::<TestClass3>(Arc::new(DefaultTranslator)))
        .union(
            Query::from_table::<TestClass2>(Arc::new(DefaultTranslator))
                .select(t2.col("Id"))
                .where_clause(t2.col("Id").less_than(5)),
        )
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT TestClass.Id FROM TestClass WITH(NOLOCK) UNION SELECT TestClass2.Id FROM TestClass2 WITH(NOLOCK) WHERE (TestClass2.Id < 5) UNION ALL SELECT * FROM TestClass3 WITH(NOLOCK)"
    );
}

#[test]
fn test_mysql_row_limit_and_read_hint() {
    let t = TestClass::schema();
    let sql = Query::from_table::<TestClass>(Dialect::MySql.translator())
        .where_clause(t.col("Done"))
        .top(3)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM TestClass WHERE (TestClass.Done = TRUE) LIMIT 3");
}

#[test]
fn test_sqlserver_select_as() {
    let t = TestClass::schema();
    let sql = Query::from_table::<TestClass>(Dialect::SqlServer.translator())
        .select_as(coalesce(t.col("Name"), "none"), "Label")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT ISNULL(TestClass.Name, 'none') AS [Label] FROM TestClass WITH(NOLOCK)"
    );
}

#[test]
fn test_build_surfaces_first_error() {
    let t = TestClass::schema();
    let err = query()
        .where_clause(t.col("Nope").equals(1))
        .order_by(t.col("Id"))
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "Field 'Nope' is not declared on 'TestClass'");
}
