use std::sync::Arc;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::data_access::repository::{Repository, StoreResult};
use crate::project::{Project, TaskRef};
use crate::task::{ProjectRef, Task};

const PROJECTS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("projects");
const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");

/// Store adapter over redb. Documents are JSON-encoded and keyed by their
/// UUID bytes; every mutation runs inside a single write transaction.
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
}

impl DataContext {
    pub fn new(path: &str) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        let _ = write_txn.open_table(PROJECTS_TABLE)?;
        let _ = write_txn.open_table(TASKS_TABLE)?;
        write_txn.commit()?;
        Ok(DataContext { db: Arc::new(db) })
    }

    fn put_doc<T: Serialize>(
        &self,
        table_def: TableDefinition<&[u8], &[u8]>,
        id: Uuid,
        doc: &T,
    ) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            let bytes = serde_json::to_vec(doc)?;
            table.insert(id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_doc<T: DeserializeOwned>(
        &self,
        table_def: TableDefinition<&[u8], &[u8]>,
        id: Uuid,
    ) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;
        match table.get(id.as_bytes().as_slice())? {
            Some(data) => Ok(Some(serde_json::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    fn list_docs<T: DeserializeOwned>(
        &self,
        table_def: TableDefinition<&[u8], &[u8]>,
    ) -> StoreResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    /// Read-modify-write under one transaction. The closure returns whether
    /// it changed the document; an untouched or missing document reports
    /// zero modified, mirroring the update semantics the engines rely on.
    fn modify_doc<T, F>(
        &self,
        table_def: TableDefinition<&[u8], &[u8]>,
        id: Uuid,
        mutate: F,
    ) -> StoreResult<u64>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> bool,
    {
        let write_txn = self.db.begin_write()?;
        let modified;
        {
            let mut table = write_txn.open_table(table_def)?;
            let current: Option<T> = match table.get(id.as_bytes().as_slice())? {
                Some(data) => Some(serde_json::from_slice(data.value())?),
                None => None,
            };

            match current {
                Some(mut doc) => {
                    if mutate(&mut doc) {
                        let bytes = serde_json::to_vec(&doc)?;
                        table.insert(id.as_bytes().as_slice(), bytes.as_slice())?;
                        modified = 1;
                    } else {
                        modified = 0;
                    }
                }
                None => modified = 0,
            }
        }
        write_txn.commit()?;
        Ok(modified)
    }

    fn remove_doc(&self, table_def: TableDefinition<&[u8], &[u8]>, id: Uuid) -> StoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let deleted;
        {
            let mut table = write_txn.open_table(table_def)?;
            let result = table.remove(id.as_bytes().as_slice())?;
            deleted = if result.is_some() { 1 } else { 0 };
        }
        write_txn.commit()?;
        Ok(deleted)
    }
}

impl Repository for DataContext {
    fn insert_project(&self, project: &Project) -> StoreResult<()> {
        self.put_doc(PROJECTS_TABLE, project.id, project)
    }

    fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        self.get_doc(PROJECTS_TABLE, id)
    }

    fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.list_docs(PROJECTS_TABLE)?;
        // Newest first
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    fn update_project(&self, project: &Project) -> StoreResult<u64> {
        self.modify_doc(PROJECTS_TABLE, project.id, |doc: &mut Project| {
            *doc = project.clone();
            true
        })
    }

    fn delete_project(&self, id: Uuid) -> StoreResult<u64> {
        self.remove_doc(PROJECTS_TABLE, id)
    }

    fn push_task_ref(&self, project_id: Uuid, entry: TaskRef) -> StoreResult<u64> {
        self.modify_doc(PROJECTS_TABLE, project_id, |project: &mut Project| {
            project.tasks.push(entry);
            true
        })
    }

    fn pull_task_ref(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<u64> {
        self.modify_doc(PROJECTS_TABLE, project_id, |project: &mut Project| {
            let before = project.tasks.len();
            project.tasks.retain(|entry| entry.task_id != task_id);
            project.tasks.len() != before
        })
    }

    fn insert_task(&self, task: &Task) -> StoreResult<()> {
        self.put_doc(TASKS_TABLE, task.id, task)
    }

    fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        self.get_doc(TASKS_TABLE, id)
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.list_docs(TASKS_TABLE)?;
        // Newest first
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> StoreResult<u64> {
        self.modify_doc(TASKS_TABLE, task.id, |doc: &mut Task| {
            *doc = task.clone();
            true
        })
    }

    fn delete_task(&self, id: Uuid) -> StoreResult<u64> {
        self.remove_doc(TASKS_TABLE, id)
    }

    fn set_task_project(
        &self,
        task_id: Uuid,
        project: Option<ProjectRef>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        self.modify_doc(TASKS_TABLE, task_id, |task: &mut Task| {
            task.project = project;
            task.updated_at = updated_at;
            true
        })
    }
}
