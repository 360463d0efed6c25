use rusqlite::{params, Connection, OptionalExtension};

use shared_models::records::{Department, DepartmentDetails, RecordId};

use crate::DatabaseError;

pub fn insert_department(
    conn: &Connection,
    department: &DepartmentDetails,
) -> Result<RecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO departments (name) VALUES (?1)",
        params![department.name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_department(conn: &Connection, id: RecordId) -> Result<Option<Department>, DatabaseError> {
    let department = conn
        .query_row(
            "SELECT id, name FROM departments WHERE id = ?1",
            params![id],
            |row| {
                Ok(Department {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(department)
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM departments ORDER BY name")?;
    let departments = stmt
        .query_map([], |row| {
            Ok(Department {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(departments)
}

pub fn update_department(
    conn: &Connection,
    id: RecordId,
    department: &DepartmentDetails,
) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "UPDATE departments SET name = ?1 WHERE id = ?2",
        params![department.name, id],
    )?)
}

pub fn delete_department(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM departments WHERE id = ?1", params![id])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_memory_database;

    #[test]
    fn department_names_are_unique() {
        let conn = open_memory_database().unwrap();
        let details = DepartmentDetails { name: "Cardiology".into() };
        insert_department(&conn, &details).unwrap();

        let duplicate = insert_department(&conn, &details).unwrap_err();
        assert!(duplicate.is_constraint_violation(), "got {duplicate:?}");
    }

    #[test]
    fn list_is_sorted_by_name() {
        let conn = open_memory_database().unwrap();
        for name in ["Radiology", "Cardiology", "Oncology"] {
            insert_department(&conn, &DepartmentDetails { name: name.into() }).unwrap();
        }

        let names: Vec<String> = list_departments(&conn)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["Cardiology", "Oncology", "Radiology"]);
    }

    #[test]
    fn update_and_delete_report_affected_rows() {
        let conn = open_memory_database().unwrap();
        let id = insert_department(&conn, &DepartmentDetails { name: "Oncology".into() }).unwrap();

        let renamed = DepartmentDetails { name: "Haematology".into() };
        assert_eq!(update_department(&conn, id, &renamed).unwrap(), 1);
        assert_eq!(update_department(&conn, id + 100, &renamed).unwrap(), 0);
        assert_eq!(get_department(&conn, id).unwrap().unwrap().name, "Haematology");

        assert_eq!(delete_department(&conn, id).unwrap(), 1);
        assert_eq!(delete_department(&conn, id).unwrap(), 0);
        assert!(get_department(&conn, id).unwrap().is_none());
    }
}
