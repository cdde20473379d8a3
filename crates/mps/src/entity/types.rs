//! Entity record and its small enums.

/// Handle into the run's [`super::Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// Unset post-order index / ancestor label.
pub const UNSET: usize = usize::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// p-node: one input vertex.
    Original,
    /// c-node: a contracted boundary cycle.
    Contracted,
    /// Sentinel standing in for another entity inside one c-node's cycle.
    Replica,
    /// Anchor of a subtree hanging off an artificial edge.
    VirtualRoot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    NotVisited,
    ArtificialEdge,
    BoundaryPath,
    Deleted,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: Kind,
    /// Input vertex id; `UNSET` for derived entities.
    pub vertex: usize,
    pub post_index: usize,
    /// First label slot: index of the ancestor the entity was last routed to.
    pub ancestor: usize,
    /// Second label slot.
    pub status: Status,
    /// Boundary-cycle links; meaningful only while `status == BoundaryPath`
    /// or the entity is a replica inside a cycle.
    pub neighbors: [Option<EntityId>; 2],
    /// Artificial-edge roots hanging off this entity.
    pub ae: [Option<EntityId>; 2],
    /// Replicas: the original entity they stand for.
    pub origin: Option<EntityId>,
    /// The c-node this entity was last found to belong to.
    pub owner: Option<EntityId>,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    /// Originals only: graph neighbours.
    pub adj: Vec<EntityId>,
    /// c-nodes only: essential members of the boundary cycle.
    pub essentials: Vec<EntityId>,
    pub marked: bool,
}

impl Entity {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            vertex: UNSET,
            post_index: UNSET,
            ancestor: UNSET,
            status: Status::NotVisited,
            neighbors: [None, None],
            ae: [None, None],
            origin: None,
            owner: None,
            parent: None,
            children: Vec::new(),
            adj: Vec::new(),
            essentials: Vec::new(),
            marked: false,
        }
    }

    pub fn original(vertex: usize, adj: Vec<EntityId>) -> Self {
        Self {
            vertex,
            adj,
            ..Self::new(Kind::Original)
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Status::Deleted
    }
}
