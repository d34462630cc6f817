//! Dependency graph over a task set.
//!
//! Tasks live in an arena indexed by their position in the input; edges run
//! from a prerequisite to the task that requires it. Prerequisites that are
//! not part of the set are kept aside as "external" and count as already
//! satisfied.

use std::collections::{BTreeMap, HashMap};

use taskrank_core::{ensure_unique_ids, Result, Task, TaskError, TaskId};
use tracing::debug;

/// DFS marking for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Validated, acyclic dependency graph of one request.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// index -> id
    ids: Vec<TaskId>,
    /// id -> index
    index: HashMap<TaskId, usize>,
    /// index -> in-set prerequisites
    prerequisites: Vec<Vec<usize>>,
    /// index -> in-set dependents, ascending by id
    dependents: Vec<Vec<usize>>,
    /// index -> prerequisites outside the set
    external: Vec<Vec<TaskId>>,
    /// Topological order, ties broken by ascending id
    order: Vec<usize>,
}

impl TaskGraph {
    /// Build the graph and reject duplicate ids and cycles.
    pub fn validate(tasks: &[Task]) -> Result<Self> {
        ensure_unique_ids(tasks)?;

        let ids: Vec<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
        let index: HashMap<TaskId, usize> =
            ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

        let mut prerequisites = vec![Vec::new(); tasks.len()];
        let mut dependents = vec![Vec::new(); tasks.len()];
        let mut external = vec![Vec::new(); tasks.len()];

        for (i, task) in tasks.iter().enumerate() {
            for dep in &task.dependencies {
                match index.get(dep) {
                    Some(&p) => {
                        prerequisites[i].push(p);
                        dependents[p].push(i);
                    }
                    None => external[i].push(dep.clone()),
                }
            }
        }

        for list in &mut dependents {
            list.sort_by(|a, b| ids[*a].cmp(&ids[*b]));
        }

        let mut graph = Self {
            ids,
            index,
            prerequisites,
            dependents,
            external,
            order: Vec::new(),
        };

        if let Some(cycle) = graph.find_cycle() {
            debug!(?cycle, "dependency cycle detected");
            return Err(TaskError::CyclicDependency(cycle));
        }

        graph.order = graph.topological_sort();
        Ok(graph)
    }

    /// Number of tasks in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Arena index of a task id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// In-set prerequisites of the task at `index`.
    pub fn prerequisites_of(&self, index: usize) -> &[usize] {
        &self.prerequisites[index]
    }

    /// In-set dependents of the task at `index`, ascending by id.
    pub fn dependents_of(&self, index: usize) -> &[usize] {
        &self.dependents[index]
    }

    /// Prerequisites named by the task at `index` that are not in the set.
    pub fn external_of(&self, index: usize) -> &[TaskId] {
        &self.external[index]
    }

    /// Arena indices in topological order.
    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    /// Task ids in topological order.
    pub fn ordered_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.order.iter().map(|&i| &self.ids[i])
    }

    /// Number of distinct tasks that transitively depend on `index`.
    pub fn downstream_count(&self, index: usize) -> usize {
        let mut seen = vec![false; self.len()];
        let mut stack = vec![index];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            for &next in &self.dependents[node] {
                if !seen[next] {
                    seen[next] = true;
                    count += 1;
                    stack.push(next);
                }
            }
        }
        count
    }

    /// Three-colour DFS. Roots are visited in ascending id order so the
    /// reported cycle is stable across runs.
    fn find_cycle(&self) -> Option<Vec<TaskId>> {
        let mut marks = vec![Mark::Unvisited; self.len()];
        let mut roots: Vec<usize> = (0..self.len()).collect();
        roots.sort_by(|a, b| self.ids[*a].cmp(&self.ids[*b]));

        for root in roots {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // (node, next dependent to look at)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            marks[root] = Mark::InProgress;

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let child = self.dependents[node].get(top.1).copied();
                top.1 += 1;

                match child {
                    Some(child) => match marks[child] {
                        Mark::Unvisited => {
                            marks[child] = Mark::InProgress;
                            stack.push((child, 0));
                        }
                        Mark::InProgress => {
                            let start = stack
                                .iter()
                                .position(|(n, _)| *n == child)
                                .unwrap_or(0);
                            return Some(
                                stack[start..]
                                    .iter()
                                    .map(|(n, _)| self.ids[*n].clone())
                                    .collect(),
                            );
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        None
    }

    /// Kahn's algorithm; among ready tasks the smallest id goes first.
    fn topological_sort(&self) -> Vec<usize> {
        let mut pending: Vec<usize> = self.prerequisites.iter().map(Vec::len).collect();
        let mut ready: BTreeMap<&TaskId, usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, n)| **n == 0)
            .map(|(i, _)| (&self.ids[i], i))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some((_, node)) = ready.pop_first() {
            order.push(node);
            for &child in &self.dependents[node] {
                pending[child] -= 1;
                if pending[child] == 0 {
                    ready.insert(&self.ids[child], child);
                }
            }
        }
        order
    }
}
