// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("未找到数据")]
    NotFound,

    #[error("无效参数: {0}")]
    InvalidParameter(String),
}

/// 缓存错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("缓存容量必须大于0")]
    ZeroCapacity,

    #[error("缓存后端错误: {0}")]
    Backend(String),
}
