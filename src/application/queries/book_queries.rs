//! Book Queries

use crate::domain::book::ProfileId;

/// 获取成书分页概要
#[derive(Debug, Clone)]
pub struct GetBookPagination {
    pub profile_id: ProfileId,
}

/// 获取指定书页内容
#[derive(Debug, Clone)]
pub struct GetBookPage {
    pub profile_id: ProfileId,
    /// 全局页号（0 为封面）
    pub page: usize,
}

/// 获取成书进度
#[derive(Debug, Clone)]
pub struct GetBookProgress {
    pub profile_id: ProfileId,
}
