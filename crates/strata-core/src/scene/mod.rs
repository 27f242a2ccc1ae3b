// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The scene model: objects, layers of objects, and the identities that tie
//! them together.

pub mod entity;
pub mod ids;
pub mod layer;
pub mod object;

pub use entity::{lock_entity, share, Dispatch, Entity, EntityHandle};
pub use ids::{IdGenerator, ObjectId};
pub use layer::Layer;
pub use object::{Object, ObjectState};
